//! Turns decoded gif documents into animations a display driver
//! can walk by index
//!
//! The gif decoder hands over sub-images carrying delay and offset
//! metadata. [`Animation::from_gif`] strings them into an ordered
//! frame list and exposes a wrapping cursor for the driver. Timing
//! and looping policy stay with the driver, this crate only holds
//! the frames.
#![cfg_attr(not(feature = "std"), no_std)]

#[macro_use]
extern crate alloc;

mod animation;
mod frame;

pub use animation::Animation;
pub use frame::Frame;
