// Copyright 2025 the SDF Atlas Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

mod env;
pub(crate) mod font;
mod mock;

pub(crate) use env::{FONT, TestEnv, cell_pixels};
pub(crate) use mock::{EMPTY_OUTLINE, MockRasterizer, NO_UNDERLINE, OVERSIZED, OVERSIZED_VALUE};
