//! End to end tests over the whole generation pipeline.

#[cfg(test)]
mod utils;

#[cfg(test)]
mod discovery;
#[cfg(test)]
mod pipeline;
#[cfg(test)]
mod sessions;
