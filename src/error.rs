// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use thiserror::Error;

/// Why an insertion was refused. A failed insertion leaves the diagram as
/// it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoronoiError {
    #[error("site ({x}, {y}) is not inside the disk of radius {far_radius}")]
    OutOfBounds { x: f64, y: f64, far_radius: f64 },

    #[error("unknown point handle {0}")]
    UnknownHandle(usize),

    #[error("duplicate site: {0}")]
    Duplicate(String),

    #[error("site would cross an existing segment: {0}")]
    Crossing(String),

    #[error("could not classify the diagram consistently: {0}")]
    Degeneracy(String),
}
