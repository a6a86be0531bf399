//! Line-level unified diff
//!
//! Myers' O(ND) shortest edit script between the expected and actual line
//! sequences, found in linear space and grouped into hunks in unified format:
//!
//! ```text
//! --- expected
//! +++ actual
//! @@ -4 +4 @@
//! -q 0 3
//! +q 0 4
//! ```

use std::fmt;
use std::ops::{Index, IndexMut, Range};

/// One step of an edit script, with the line positions it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Equal { old: usize, new: usize },
    Delete { old: usize },
    Insert { new: usize },
}

impl Edit {
    fn is_change(self) -> bool {
        !matches!(self, Edit::Equal { .. })
    }
}

/// Kind of a rendered diff line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTag {
    Context,
    Removed,
    Added,
}

impl LineTag {
    fn marker(self) -> char {
        match self {
            LineTag::Context => ' ',
            LineTag::Removed => '-',
            LineTag::Added => '+',
        }
    }
}

/// A contiguous region of change plus its surrounding context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    /// Zero-based start line in the expected text.
    pub old_start: usize,
    pub old_len: usize,
    /// Zero-based start line in the actual text.
    pub new_start: usize,
    pub new_len: usize,
    pub lines: Vec<(LineTag, String)>,
}

/// Unified range notation: a single line prints only its start, an empty
/// range prints the line before it with length 0.
fn format_range(start: usize, len: usize) -> String {
    match len {
        0 => format!("{},0", start),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, len),
    }
}

impl fmt::Display for Hunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@@ -{} +{} @@",
            format_range(self.old_start, self.old_len),
            format_range(self.new_start, self.new_len)
        )?;
        for (tag, line) in &self.lines {
            write!(f, "\n{}{}", tag.marker(), line)?;
        }
        Ok(())
    }
}

/// Difference between an expected and an actual text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnifiedDiff {
    pub from_label: String,
    pub to_label: String,
    pub hunks: Vec<Hunk>,
}

impl UnifiedDiff {
    /// Diff `expected` against `actual`, keeping `context` unchanged lines
    /// around every change.
    pub fn compute(expected: &str, actual: &str, context: usize) -> Self {
        let old: Vec<&str> = expected.lines().collect();
        let new: Vec<&str> = actual.lines().collect();
        let edits = edit_script(&old, &new);
        let hunks = group_hunks(&edits, &old, &new, context);

        Self {
            from_label: "expected".to_string(),
            to_label: "actual".to_string(),
            hunks,
        }
    }

    /// True when the line sequences are identical. The raw texts may still
    /// differ in line terminators.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    pub fn removed_lines(&self) -> usize {
        self.count_tag(LineTag::Removed)
    }

    pub fn added_lines(&self) -> usize {
        self.count_tag(LineTag::Added)
    }

    fn count_tag(&self, tag: LineTag) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| h.lines.iter())
            .filter(|(t, _)| *t == tag)
            .count()
    }
}

impl fmt::Display for UnifiedDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hunks.is_empty() {
            return Ok(());
        }
        write!(f, "--- {}\n+++ {}", self.from_label, self.to_label)?;
        for hunk in &self.hunks {
            write!(f, "\n{}", hunk)?;
        }
        Ok(())
    }
}

/// Each direction of the middle-snake search stops after this many edits.
/// A region that needs more is reported as removed and re-added in full.
const MAX_SEARCH_DEPTH: usize = 2048;

/// Furthest-reaching `x` per diagonal `k = x - y`, indexed by signed `k`.
struct Frontier {
    offset: isize,
    v: Vec<usize>,
}

impl Frontier {
    fn new(max_d: usize) -> Self {
        Self {
            offset: max_d as isize,
            v: vec![0; 2 * max_d + 1],
        }
    }
}

impl Index<isize> for Frontier {
    type Output = usize;

    fn index(&self, k: isize) -> &usize {
        &self.v[(k + self.offset) as usize]
    }
}

impl IndexMut<isize> for Frontier {
    fn index_mut(&mut self, k: isize) -> &mut usize {
        &mut self.v[(k + self.offset) as usize]
    }
}

fn search_depth(n: usize, m: usize) -> usize {
    ((n + m + 1) / 2 + 1).min(MAX_SEARCH_DEPTH)
}

fn common_prefix(a: &[&str], b: &[&str]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn common_suffix(a: &[&str], b: &[&str]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Full edit script in linear space: Myers' divide and conquer around the
/// middle snake.
fn edit_script(old: &[&str], new: &[&str]) -> Vec<Edit> {
    let max_d = search_depth(old.len(), new.len());
    let mut script = Script {
        old,
        new,
        forward: Frontier::new(max_d),
        backward: Frontier::new(max_d),
        edits: Vec::with_capacity(old.len().max(new.len())),
    };
    script.conquer(0..old.len(), 0..new.len());
    script.edits
}

struct Script<'a> {
    old: &'a [&'a str],
    new: &'a [&'a str],
    forward: Frontier,
    backward: Frontier,
    edits: Vec<Edit>,
}

impl Script<'_> {
    fn conquer(&mut self, mut old_range: Range<usize>, mut new_range: Range<usize>) {
        let prefix = common_prefix(&self.old[old_range.clone()], &self.new[new_range.clone()]);
        self.edits.extend((0..prefix).map(|i| Edit::Equal {
            old: old_range.start + i,
            new: new_range.start + i,
        }));
        old_range.start += prefix;
        new_range.start += prefix;

        let suffix = common_suffix(&self.old[old_range.clone()], &self.new[new_range.clone()]);
        old_range.end -= suffix;
        new_range.end -= suffix;

        if old_range.is_empty() || new_range.is_empty() {
            self.replace(old_range.clone(), new_range.clone());
        } else {
            match self.middle_snake(old_range.clone(), new_range.clone()) {
                Some((x, y)) => {
                    self.conquer(old_range.start..x, new_range.start..y);
                    self.conquer(x..old_range.end, y..new_range.end);
                }
                None => self.replace(old_range.clone(), new_range.clone()),
            }
        }

        self.edits.extend((0..suffix).map(|i| Edit::Equal {
            old: old_range.end + i,
            new: new_range.end + i,
        }));
    }

    fn replace(&mut self, old_range: Range<usize>, new_range: Range<usize>) {
        self.edits.extend(old_range.map(|old| Edit::Delete { old }));
        self.edits.extend(new_range.map(|new| Edit::Insert { new }));
    }

    /// Absolute split point on an optimal path through the region, strictly
    /// inside it. `None` when the search depth runs out first.
    fn middle_snake(
        &mut self,
        old_range: Range<usize>,
        new_range: Range<usize>,
    ) -> Option<(usize, usize)> {
        let (old, new) = (self.old, self.new);
        let old = &old[old_range.clone()];
        let new = &new[new_range.clone()];
        let (n, m) = (old.len(), new.len());
        let delta = n as isize - m as isize;
        let odd = delta & 1 == 1;
        let fwd = &mut self.forward;
        let bwd = &mut self.backward;

        fwd[1] = 0;
        bwd[1] = 0;
        let mut split = None;

        'search: for d in 0..search_depth(n, m) as isize {
            for k in (-d..=d).rev().step_by(2) {
                let x0 = if k == -d || (k != d && fwd[k - 1] < fwd[k + 1]) {
                    fwd[k + 1]
                } else {
                    fwd[k - 1] + 1
                };
                let y0 = (x0 as isize - k) as usize;
                let mut x = x0;
                if x0 < n && y0 < m {
                    x += common_prefix(&old[x0..], &new[y0..]);
                }
                fwd[k] = x;

                if odd && (k - delta).abs() < d && x + bwd[delta - k] >= n {
                    split = Some((x0, y0));
                    break 'search;
                }
            }

            for k in (-d..=d).rev().step_by(2) {
                let x0 = if k == -d || (k != d && bwd[k - 1] < bwd[k + 1]) {
                    bwd[k + 1]
                } else {
                    bwd[k - 1] + 1
                };
                let y0 = (x0 as isize - k) as usize;
                let mut x = x0;
                if x0 < n && y0 < m {
                    x += common_suffix(&old[..n - x0], &new[..m - y0]);
                }
                bwd[k] = x;

                if !odd && (k - delta).abs() <= d && x + fwd[delta - k] >= n {
                    let y = (x as isize - k) as usize;
                    split = n.checked_sub(x).zip(m.checked_sub(y));
                    break 'search;
                }
            }
        }

        // Off-grid or degenerate splits never recurse.
        split
            .filter(|&(x, y)| x <= n && y <= m && x + y > 0 && x + y < n + m)
            .map(|(x, y)| (old_range.start + x, new_range.start + y))
    }
}

/// Split the script into hunks. Changes separated by at most `2 * context`
/// equal lines share a hunk.
fn group_hunks(edits: &[Edit], old: &[&str], new: &[&str], context: usize) -> Vec<Hunk> {
    // Line cursors before each edit.
    let mut cursors = Vec::with_capacity(edits.len() + 1);
    let (mut o, mut n) = (0usize, 0usize);
    for edit in edits {
        cursors.push((o, n));
        match edit {
            Edit::Equal { .. } => {
                o += 1;
                n += 1;
            }
            Edit::Delete { .. } => o += 1,
            Edit::Insert { .. } => n += 1,
        }
    }
    cursors.push((o, n));

    let changes: Vec<usize> = edits
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_change())
        .map(|(i, _)| i)
        .collect();
    let Some(&first) = changes.first() else {
        return Vec::new();
    };

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    let (mut lo, mut hi) = (first, first);
    for &i in &changes[1..] {
        if i - hi - 1 <= 2 * context {
            hi = i;
        } else {
            ranges.push((lo, hi));
            lo = i;
            hi = i;
        }
    }
    ranges.push((lo, hi));

    ranges
        .into_iter()
        .map(|(lo, hi)| {
            let start = lo.saturating_sub(context);
            let end = (hi + 1 + context).min(edits.len());
            let (old_start, new_start) = cursors[start];
            let (old_end, new_end) = cursors[end];
            Hunk {
                old_start,
                old_len: old_end - old_start,
                new_start,
                new_len: new_end - new_start,
                lines: render_lines(&edits[start..end], old, new),
            }
        })
        .collect()
}

/// Within each run of changes, removals print before additions.
fn render_lines(edits: &[Edit], old: &[&str], new: &[&str]) -> Vec<(LineTag, String)> {
    let mut lines = Vec::with_capacity(edits.len());
    let mut removed = Vec::new();
    let mut added = Vec::new();

    let flush = |lines: &mut Vec<(LineTag, String)>,
                 removed: &mut Vec<(LineTag, String)>,
                 added: &mut Vec<(LineTag, String)>| {
        lines.append(removed);
        lines.append(added);
    };

    for edit in edits {
        match *edit {
            Edit::Equal { old: i, .. } => {
                flush(&mut lines, &mut removed, &mut added);
                lines.push((LineTag::Context, old[i].to_string()));
            }
            Edit::Delete { old: i } => removed.push((LineTag::Removed, old[i].to_string())),
            Edit::Insert { new: j } => added.push((LineTag::Added, new[j].to_string())),
        }
    }
    flush(&mut lines, &mut removed, &mut added);
    lines
}
