//! Core routines shared by the pixmat decoder crates
//!
//! This crate provides the plumbing the format decoders under the
//! `pixmat` umbrella have in common
//!
//! - A bytestream reader with endian aware reads over borrowed input
//! - Colorspace information for decoded buffers
//! - Decoder and encoder options
//!
//! The crate is `#[no_std]` compatible; the `std` feature (default)
//! links against std.
#![cfg_attr(not(feature = "std"), no_std)]

pub mod bytestream;
pub mod colorspace;
pub mod options;
