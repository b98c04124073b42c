//! Alert model.
//!
//! This module contains the passive description of a modal choice and the
//! presented form handed to presentation surfaces.

pub mod descriptor;
pub mod presented;

pub use {
    descriptor::{
        AlertButton, AlertDescriptor, AlertDescriptorBuilder, AlertStyle, ButtonCallback,
        ButtonStyle,
    },
    presented::{PresentedAlert, PresentedButton},
};
