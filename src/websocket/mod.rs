pub mod factory;

pub use factory::WebSocketFactory;
