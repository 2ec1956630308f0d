pub mod declarations;
pub mod hooks;
pub mod module;
