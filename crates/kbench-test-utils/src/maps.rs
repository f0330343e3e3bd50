//! Address-space inspection through `/proc/self/maps`.
//!
//! Used to check that no arena survives a finished run. Callers should
//! keep each such check in its own test binary with a single test, so no
//! parallel test can map memory at a just-released address.

use std::fs;

/// One line of `/proc/self/maps`: the half-open range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mapping {
    pub start: usize,
    pub end: usize,
}

impl Mapping {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, addr: usize) -> bool {
        (self.start..self.end).contains(&addr)
    }
}

/// Parse one `/proc/<pid>/maps` line.
pub fn parse_line(line: &str) -> Option<Mapping> {
    let range = line.split_whitespace().next()?;
    let (start, end) = range.split_once('-')?;
    Some(Mapping {
        start: usize::from_str_radix(start, 16).ok()?,
        end: usize::from_str_radix(end, 16).ok()?,
    })
}

/// Every mapping of the current process.
pub fn mappings() -> Vec<Mapping> {
    fs::read_to_string("/proc/self/maps")
        .expect("failed to read /proc/self/maps")
        .lines()
        .filter_map(parse_line)
        .collect()
}

/// Whether any mapping covers `addr`.
pub fn is_mapped(addr: usize) -> bool {
    mappings().iter().any(|m| m.contains(addr))
}

/// Size of the largest mapping in the process.
pub fn largest_mapping() -> usize {
    mappings().iter().map(Mapping::len).max().unwrap_or(0)
}
