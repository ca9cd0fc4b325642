// Tidemark batch watermarking library

pub mod archive;
pub mod constants;
pub mod export;
pub mod ingest;
pub mod logging;
pub mod pipeline;
pub mod session;
pub mod settings;
pub mod watermark;
