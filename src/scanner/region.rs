//! Blank, word and line-block queries

use super::condition::{NonBlank, StopCondition, WordBoundary};
use super::{linear, Bound, HeuristicScanner};
use crate::document::Region;
use crate::error::Result;

impl<'a> HeuristicScanner<'a> {
    /// Lowest non-blank position in `[position, bound)`
    ///
    /// With `line_break_is_blank`, line breaks are skipped like spaces.
    pub fn find_non_blank_forward(
        &mut self,
        position: usize,
        bound: Bound,
        line_break_is_blank: bool,
    ) -> Option<usize> {
        self.scan_forward_with(position, bound, &mut NonBlank::shared(line_break_is_blank))
    }

    /// Highest non-blank position in `(bound, position]`
    pub fn find_non_blank_backward(
        &mut self,
        position: usize,
        bound: Bound,
        line_break_is_blank: bool,
    ) -> Option<usize> {
        self.scan_backward_with(position, bound, &mut NonBlank::shared(line_break_is_blank))
    }

    /// Maximal run of characters around `position` on which `condition`
    /// does not stop
    ///
    /// The run must extend forward from `position` unless `allow_closing`
    /// is set, in which case a run ending right before `position` counts too.
    pub fn find_region<C: StopCondition + ?Sized>(
        &mut self,
        position: usize,
        condition: &mut C,
        allow_closing: bool,
    ) -> Option<Region> {
        let position = position.min(self.document().len());
        let end = match self.scan_forward_with(position, Bound::Unbound, condition) {
            Some(end) => end as isize,
            None => self.position(),
        };

        let mut start = position as isize;
        if allow_closing || end > start {
            let (ctx, state) = self.session();
            start = match linear::scan_backward(&ctx, state, start - 1, Bound::Unbound, condition) {
                Some(start) => start as isize,
                None => state.position,
            };
            start += 1;
        }

        (start < end).then(|| Region::new(start as usize, (end - start) as usize))
    }

    /// Run of blanks starting at `position`
    pub fn find_blank_region(&mut self, position: usize, line_break_is_blank: bool) -> Option<Region> {
        self.find_region(position, &mut NonBlank::shared(line_break_is_blank), false)
    }

    /// Alphanumeric word starting at or containing `position`
    pub fn find_common_word(&mut self, position: usize) -> Option<Region> {
        self.find_region(position, &mut WordBoundary, false)
    }

    /// Check if the line holding `position` has no non-blank character
    pub fn is_blank_line(&mut self, position: usize) -> Result<bool> {
        let line = self.document().line_information_of_offset(position)?;
        if line.is_empty() {
            return Ok(true);
        }
        Ok(self
            .find_non_blank_forward(line.offset, Bound::At(line.end()), false)
            .is_none())
    }

    /// Whole lines from the line of `position1` through the line of `position2`
    ///
    /// A `position2` exactly at the start of a later line does not pull that
    /// line in. Positions given in reverse order are swapped.
    pub fn get_text_block(&mut self, position1: usize, position2: usize) -> Result<Region> {
        let (position1, position2) = if position1 <= position2 {
            (position1, position2)
        } else {
            (position2, position1)
        };
        let document = self.document();
        let line1 = document.line_of_offset(position1)?;
        let mut line2 = document.line_of_offset(position2)?;
        if line1 < line2 && document.line_offset(line2)? == position2 {
            line2 -= 1;
        }
        let start = document.line_offset(line1)?;
        let end = document.line_offset(line2)? + document.line_length(line2)?;
        Ok(Region::new(start, end - start))
    }

    pub fn get_first_line_of_region(&self, region: Region) -> Result<usize> {
        self.document().line_of_offset(region.offset)
    }

    /// Line holding the last character of `region`
    pub fn get_last_line_of_region(&self, region: Region) -> Result<usize> {
        if region.is_empty() {
            return self.document().line_of_offset(region.offset);
        }
        self.document().line_of_offset(region.end() - 1)
    }
}
