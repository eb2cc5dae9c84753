// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

/// Counters collected by one engine run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DfsStatistics {
    /// Decisions applied, counting both polarities of a flipped frame.
    pub nodes_explored: u64,
    /// Frames flipped or popped on conflict.
    pub backtracks: u64,
    /// Bindings applied, decisions and propagated consequences alike.
    pub propagations: u64,
    /// Deepest decision level reached.
    pub max_depth: usize,
}

impl std::fmt::Display for DfsStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DfsStatistics(nodes: {}, backtracks: {}, propagations: {}, max_depth: {})",
            self.nodes_explored, self.backtracks, self.propagations, self.max_depth
        )
    }
}
