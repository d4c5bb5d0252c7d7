pub mod checkout;
pub mod console;
pub mod http;
pub mod in_memory;
pub mod scripted;
