pub mod consts;
pub mod gateway;
pub mod model;
