// Interface adapters: wire protocol and serialization tasks.

pub mod net;
pub mod protocol;
pub mod state;
