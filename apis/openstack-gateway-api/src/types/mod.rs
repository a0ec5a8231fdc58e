// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! OpenStack gateway type definitions

pub mod cluster;
pub mod flavor;
pub mod image;
pub mod network;
pub mod server;
pub mod session;

pub use cluster::*;
pub use flavor::*;
pub use image::*;
pub use network::*;
pub use server::*;
pub use session::*;
