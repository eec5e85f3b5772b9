//! Extensions exercised end to end through the Pipeline

mod gfm;
mod kbd;
