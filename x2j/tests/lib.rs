// This file is required to make `cargo test` discover tests in subdirectories.

#[cfg(test)]
mod common;

#[cfg(test)]
mod errors;

#[cfg(test)]
mod projection;

#[cfg(test)]
mod structural;
