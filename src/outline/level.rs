//! Heading depth assignment.

use crate::model::{Heading, HeadingLevel, Line};

use super::classify::NumberingPattern;
use super::stats::HeadingSizes;

/// Where a heading's level came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSource {
    /// Leading section number
    Numbering,
    /// Rank of the font size among heading sizes
    SizeRank,
}

/// Assigns H1-H3 from section numbers first, font size rank second.
#[derive(Debug, Clone)]
pub struct LevelAssigner<'a> {
    numbering: &'a NumberingPattern,
    sizes: HeadingSizes,
}

impl<'a> LevelAssigner<'a> {
    /// Create an assigner over the accepted heading lines.
    pub fn new(numbering: &'a NumberingPattern, headings: &[Line], size_levels: usize) -> Self {
        Self {
            numbering,
            sizes: HeadingSizes::from_headings(headings, size_levels),
        }
    }

    /// The size ranking in use.
    pub fn sizes(&self) -> &HeadingSizes {
        &self.sizes
    }

    /// Level for one heading line and the evidence it came from.
    pub fn level_of(&self, line: &Line) -> (HeadingLevel, LevelSource) {
        match self.numbering.depth(&line.text) {
            Some(depth) => (HeadingLevel::from_depth(depth), LevelSource::Numbering),
            None => (self.sizes.level_for(line.size), LevelSource::SizeRank),
        }
    }

    /// Attach a level to every heading line, keeping order.
    pub fn assign(&self, headings: Vec<Line>) -> Vec<Heading> {
        headings
            .into_iter()
            .map(|line| {
                let (level, _) = self.level_of(&line);
                Heading { line, level }
            })
            .collect()
    }
}
