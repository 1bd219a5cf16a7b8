//! Matching of bracket and quote pairs

use log::trace;

use super::condition::{CharSet, EscapedCharSet, PartitionGated, StopCondition};
use super::{linear, Bound, HeuristicScanner, PeerPair, ScanContext, ScanState};
use crate::error::Result;

impl<'a> HeuristicScanner<'a> {
    /// Closing peer matching the opening peer at `start`
    ///
    /// Nested pairs inside accepted partitions are skipped; characters in
    /// rejected partitions are ignored entirely. A `start` outside the
    /// document finds nothing.
    pub fn find_closing_peer(&mut self, start: usize, pair: PeerPair) -> Option<usize> {
        let mut condition = PartitionGated::new(CharSet::new(&pair.chars()));
        self.find_closing_peer_with(start, pair, &mut condition)
    }

    /// Like [`find_closing_peer`](Self::find_closing_peer), but a peer
    /// preceded by `escape` does not count
    ///
    /// Escapes are honored in every partition, so an escape closing a
    /// rejected partition still protects the character after it.
    pub fn find_closing_peer_escaped(&mut self, start: usize, pair: PeerPair, escape: char) -> Option<usize> {
        let mut condition = EscapedCharSet::new(&pair.chars(), escape);
        self.find_closing_peer_with(start, pair, &mut condition)
    }

    fn find_closing_peer_with<C: StopCondition>(
        &mut self,
        start: usize,
        pair: PeerPair,
        condition: &mut C,
    ) -> Option<usize> {
        let (ctx, state) = self.session();
        if start >= ctx.document.len() {
            return None;
        }
        let mut depth = 1usize;
        let mut next = start + 1;
        loop {
            let found = linear::scan_forward(&ctx, state, next, Bound::Unbound, condition)?;
            if ctx.document.char_at(found).ok()? == pair.open && !pair.is_symmetric() {
                depth += 1;
            } else {
                depth -= 1;
            }
            if depth == 0 {
                return Some(found);
            }
            next = found + 1;
        }
    }

    /// Opening peer matching the closing peer at `start`
    ///
    /// A `start` at or past the end of the document searches from the last
    /// character.
    pub fn find_opening_peer(&mut self, start: usize, pair: PeerPair) -> Option<usize> {
        let mut condition = PartitionGated::new(CharSet::new(&pair.chars()));
        let (ctx, state) = self.session();
        let start = start.min(ctx.document.len());

        let mut depth = 1usize;
        let mut next = start as isize - 1;
        loop {
            let found = linear::scan_backward(&ctx, state, next, Bound::Unbound, &mut condition)?;
            if ctx.document.char_at(found).ok()? == pair.close && !pair.is_symmetric() {
                depth += 1;
            } else {
                depth -= 1;
            }
            if depth == 0 {
                return Some(found);
            }
            next = found as isize - 1;
        }
    }

    /// Like [`find_opening_peer`](Self::find_opening_peer), but a peer
    /// preceded by `escape` does not count
    ///
    /// Escapes can only be recognized reading forward, so every line is
    /// pre-scanned left to right and its matches consumed in reverse.
    pub fn find_opening_peer_escaped(&mut self, start: usize, pair: PeerPair, escape: char) -> Option<usize> {
        let mut condition = EscapedCharSet::new(&pair.chars(), escape);
        let (ctx, state) = self.session();
        let start = start.min(ctx.document.len());

        opening_peer_escaped(&ctx, state, start, pair, &mut condition).unwrap_or_else(|e| {
            trace!("opening peer search aborted: {}", e);
            None
        })
    }
}

fn opening_peer_escaped<C: StopCondition + ?Sized>(
    ctx: &ScanContext<'_>,
    state: &mut ScanState,
    start: usize,
    pair: PeerPair,
    condition: &mut C,
) -> Result<Option<usize>> {
    let mut depth = 1usize;
    let mut line = ctx.document.line_of_offset(start)? as isize;
    let mut scan_end = start;
    loop {
        let (matches, next_line) = pre_scan_backward(ctx, state, line, scan_end, -1, condition)?;
        if matches.is_empty() {
            return Ok(None);
        }
        for &found in matches.iter().rev() {
            if ctx.document.char_at(found)? == pair.close && !pair.is_symmetric() {
                depth += 1;
            } else {
                depth -= 1;
            }
            if depth == 0 {
                return Ok(Some(found));
            }
        }
        // The line holding the matches is exhausted; continue above it
        scan_end = ctx.document.line_offset((next_line + 1) as usize)?;
        line = next_line;
    }
}

/// Matches of `condition` on the nearest line at or above `line` that has any
///
/// Each line is scanned forward from its start up to `scan_end` (the start
/// offset of the line below, after the first). Only matches greater than
/// `bound` are kept. Returns the matches in ascending order together with
/// the line above the last one scanned; an empty list means nothing was
/// found down to `bound`.
pub(crate) fn pre_scan_backward<C: StopCondition + ?Sized>(
    ctx: &ScanContext<'_>,
    state: &mut ScanState,
    line: isize,
    scan_end: usize,
    bound: isize,
    condition: &mut C,
) -> Result<(Vec<usize>, isize)> {
    let mut matches = Vec::new();
    let mut line = line;
    let mut scan_end = scan_end;

    while matches.is_empty() && line >= 0 {
        let line_offset = ctx.document.line_offset(line as usize)?;
        let mut next = line_offset;
        while next < scan_end {
            match linear::scan_forward(ctx, state, next, Bound::At(scan_end), condition) {
                Some(found) => {
                    if bound < found as isize {
                        matches.push(found);
                    }
                    next = found + 1;
                }
                None => break,
            }
        }

        line -= 1;
        if line_offset as isize <= bound {
            break;
        }
        scan_end = line_offset;
    }
    Ok((matches, line))
}
