// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! This crate contains the HTTP vocabulary shared by the request parser and
//! the transport: methods, ordered field maps, parse errors and the finished
//! request.

pub mod error;
pub mod method;
pub mod ordered_map;
pub mod request;
pub mod syntax;

pub use error::*;
pub use method::*;
pub use ordered_map::*;
pub use request::*;
