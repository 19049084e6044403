pub mod builtin;
pub mod interp;
pub mod store;
pub mod value;
