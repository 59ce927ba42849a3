// Generation outcome analytics: background recorder, sinks, and the summary endpoint.

pub mod handlers;
pub mod recorder;
pub mod sink;
