use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::attributes::AttributeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRun {
    pub len: usize,
    #[serde(default, skip_serializing_if = "AttributeMap::is_empty")]
    pub attributes: AttributeMap,
}

impl AttributeRun {
    pub fn new(len: usize, attributes: AttributeMap) -> Self {
        Self { len, attributes }
    }
}

/// Run-length attribute storage. The runs partition `0..total_len()` with no
/// gaps, no empty runs and no two adjacent runs with equal attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct AttributeRuns {
    runs: Vec<AttributeRun>,
}

impl AttributeRuns {
    pub(crate) fn new(total_len: usize, attributes: AttributeMap) -> Self {
        let mut runs = Self {
            runs: vec![AttributeRun::new(total_len, attributes)],
        };
        runs.normalize();
        runs
    }

    pub(crate) fn from_runs(runs: Vec<AttributeRun>) -> Self {
        let mut runs = Self { runs };
        runs.normalize();
        runs
    }

    pub(crate) fn runs(&self) -> &[AttributeRun] {
        &self.runs
    }

    pub(crate) fn total_len(&self) -> usize {
        self.runs.iter().map(|r| r.len).sum()
    }

    pub(crate) fn attributes_at(&self, offset: usize) -> Option<&AttributeMap> {
        self.locate(offset).map(|(ix, _)| &self.runs[ix].attributes)
    }

    pub(crate) fn delete_range(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let runs = self.isolate(range);
        self.runs.drain(runs);
        self.normalize();
    }

    pub(crate) fn insert_runs(&mut self, offset: usize, runs: &[AttributeRun]) {
        if runs.is_empty() {
            return;
        }
        let ix = self.split_at(offset);
        self.runs.splice(ix..ix, runs.iter().cloned());
        self.normalize();
    }

    /// Runs `update` on the attributes of every char in `range`, then merges
    /// what became equal.
    pub(crate) fn update_range(
        &mut self,
        range: Range<usize>,
        update: impl FnMut(&mut AttributeMap),
    ) {
        if range.is_empty() {
            return;
        }
        let runs = self.isolate(range);
        self.runs[runs]
            .iter_mut()
            .map(|run| &mut run.attributes)
            .for_each(update);
        self.normalize();
    }

    /// The runs overlapping `range`, each cut to its bounds.
    pub(crate) fn iter_runs_in_range(
        &self,
        range: Range<usize>,
    ) -> impl Iterator<Item = (Range<usize>, &AttributeMap)> {
        let Range { start, end } = range;
        self.spans()
            .skip_while(move |(span, _)| span.end <= start)
            .take_while(move |(span, _)| span.start < end)
            .map(move |(span, run)| (span.start.max(start)..span.end.min(end), &run.attributes))
            .filter(|(span, _)| !span.is_empty())
    }

    pub(crate) fn slice(&self, range: Range<usize>) -> Vec<AttributeRun> {
        self.iter_runs_in_range(range)
            .map(|(range, attributes)| AttributeRun::new(range.len(), attributes.clone()))
            .collect()
    }

    fn spans(&self) -> impl Iterator<Item = (Range<usize>, &AttributeRun)> {
        self.runs.iter().scan(0, |start, run| {
            let span = *start..*start + run.len;
            *start = span.end;
            Some((span, run))
        })
    }

    /// Index and start offset of the run holding the char at `offset`.
    fn locate(&self, offset: usize) -> Option<(usize, usize)> {
        self.spans()
            .enumerate()
            .find(|(_, (span, _))| span.contains(&offset))
            .map(|(ix, (span, _))| (ix, span.start))
    }

    /// Makes `offset` a run boundary and returns the index of the run that
    /// starts there, or the run count at the end.
    fn split_at(&mut self, offset: usize) -> usize {
        let Some((ix, start)) = self.locate(offset) else {
            return self.runs.len();
        };
        if start == offset {
            return ix;
        }
        let run = &mut self.runs[ix];
        let tail = AttributeRun::new(start + run.len - offset, run.attributes.clone());
        run.len = offset - start;
        self.runs.insert(ix + 1, tail);
        ix + 1
    }

    /// Splits at both ends of `range` and returns the indices of the runs
    /// covering it exactly.
    fn isolate(&mut self, range: Range<usize>) -> Range<usize> {
        let start = self.split_at(range.start);
        let end = self.split_at(range.end);
        start..end.max(start)
    }

    fn normalize(&mut self) {
        self.runs.retain(|run| run.len > 0);
        self.runs.dedup_by(|next, previous| {
            if next.attributes != previous.attributes {
                return false;
            }
            previous.len += next.len;
            true
        });
    }
}
