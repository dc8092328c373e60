//! Command-line front end

mod cli;
#[cfg(test)]
mod tests;

pub use cli::{format_now_playing, format_time, format_update, parse_input, Args, Cli, UserInput};
