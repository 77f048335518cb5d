//! Gapped read-to-template alignments.
//!
//! An [`Alignment`] stores two equal-length aligned strings, one for the query (read) and one
//! for the template, using [`GAP`] for gap columns. Coordinates are 0-based and half-open.
//!
//! Before an alignment is added to an [`AlignmentGraph`](crate::AlignmentGraph) it is
//! normalized with [`normalize_gaps`] so that equivalent alignments always place their gaps in
//! the same columns, and trimmed with [`trim_alignment`] to discard noisy alignment ends.

/// Gap character used in aligned strings.
pub const GAP: u8 = b'-';

/// A single read aligned to a region of a template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Alignment {
    /// Identifier of the aligned read.
    pub id: String,
    /// First template position covered by the alignment.
    pub template_start: usize,
    /// One past the last template position covered by the alignment.
    pub template_end: usize,
    /// Full length of the template.
    pub template_len: usize,
    /// First query position covered by the alignment.
    pub query_start: usize,
    /// One past the last query position covered by the alignment.
    pub query_end: usize,
    /// Full length of the query.
    pub query_len: usize,
    /// Aligned query bases, with gaps.
    pub query_aligned: Vec<u8>,
    /// Aligned template bases, with gaps.
    pub template_aligned: Vec<u8>,
}

impl Alignment {
    /// Creates an alignment from its aligned strings.
    ///
    /// The template end is derived from the number of template bases in `template_aligned`.
    /// The template and query lengths are set to the aligned extents; callers that know the
    /// full sequence lengths should overwrite `template_len`, `query_len` and the query range.
    ///
    /// # Panics
    ///
    /// Panics if the aligned strings have different lengths.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        template_start: usize,
        query_aligned: impl Into<Vec<u8>>,
        template_aligned: impl Into<Vec<u8>>,
    ) -> Self {
        let query_aligned = query_aligned.into();
        let template_aligned = template_aligned.into();
        assert_eq!(
            query_aligned.len(),
            template_aligned.len(),
            "aligned query and template strings must have the same length"
        );
        let template_end = template_start + count_bases(&template_aligned);
        let query_len = count_bases(&query_aligned);
        Self {
            id: id.into(),
            template_start,
            template_end,
            template_len: template_end,
            query_start: 0,
            query_end: query_len,
            query_len,
            query_aligned,
            template_aligned,
        }
    }

    /// Length of the aligned query string, gaps included.
    #[must_use]
    pub fn aligned_len(&self) -> usize {
        self.query_aligned.len()
    }

    /// Number of template bases covered by the alignment.
    #[must_use]
    pub fn template_span(&self) -> usize {
        self.template_end.saturating_sub(self.template_start)
    }

    /// Returns true if the alignment runs off an end of both sequences.
    ///
    /// A proper overlap reaches the start of the query or the template, and the end of the
    /// query or the template. Alignments that stop short on both sequences are internal
    /// matches, typically repeats or chimeras.
    #[must_use]
    pub fn is_proper_overlap(&self) -> bool {
        let reaches_start = self.query_start == 0 || self.template_start == 0;
        let reaches_end = self.query_end == self.query_len || self.template_end == self.template_len;
        reaches_start && reaches_end
    }
}

/// Counts the non-gap characters of an aligned string.
fn count_bases(aligned: &[u8]) -> usize {
    aligned.iter().filter(|&&b| b != GAP).count()
}

/// Returns a copy of `aln` with its gaps placed canonically.
///
/// Three rewrites are applied:
/// 1. every mismatch column is split into an insertion followed by a deletion
/// 2. each gap is swapped with the next base of the same string when that base matches the
///    opposite string's base at the gap, moving gaps to the right
/// 3. columns that became gaps in both strings are dropped
///
/// The ungapped query and template sequences, and all coordinates, are unchanged.
#[must_use]
pub fn normalize_gaps(aln: &Alignment) -> Alignment {
    let columns = aln.query_aligned.len().min(aln.template_aligned.len());
    let mut query = Vec::with_capacity(columns * 2);
    let mut template = Vec::with_capacity(columns * 2);

    for (&q, &t) in aln.query_aligned.iter().zip(&aln.template_aligned) {
        if q != t && q != GAP && t != GAP {
            query.extend_from_slice(&[GAP, q]);
            template.extend_from_slice(&[t, GAP]);
        } else {
            query.push(q);
            template.push(t);
        }
    }

    for i in 0..query.len() {
        if template[i] == GAP {
            push_gap_right(&mut template, query[i], i);
        }
        if query[i] == GAP {
            push_gap_right(&mut query, template[i], i);
        }
    }

    let (query_aligned, template_aligned) = query
        .into_iter()
        .zip(template)
        .filter(|&(q, t)| q != GAP || t != GAP)
        .unzip();

    Alignment { query_aligned, template_aligned, ..aln.clone() }
}

/// Swaps the gap at `gapped[i]` with the next base of `gapped` if that base equals `opposite`.
fn push_gap_right(gapped: &mut [u8], opposite: u8, i: usize) {
    if let Some(offset) = gapped[i + 1..].iter().position(|&b| b != GAP) {
        let j = i + 1 + offset;
        if gapped[j] == opposite {
            gapped.swap(i, j);
        }
    }
}

/// Removes `trim` template bases, with their columns, from both ends of an alignment.
///
/// Returns `None` if the alignment covers `2 * trim` template bases or fewer, or if no query
/// base survives the trim.
#[must_use]
pub fn trim_alignment(aln: Alignment, trim: usize) -> Option<Alignment> {
    if trim == 0 {
        return Some(aln);
    }
    if count_bases(&aln.template_aligned) <= 2 * trim {
        return None;
    }

    let mut left = 0;
    let mut seen = 0;
    while seen < trim {
        if aln.template_aligned[left] != GAP {
            seen += 1;
        }
        left += 1;
    }

    let mut right = aln.template_aligned.len();
    seen = 0;
    while seen < trim {
        right -= 1;
        if aln.template_aligned[right] != GAP {
            seen += 1;
        }
    }

    let query_aligned = aln.query_aligned[left..right].to_vec();
    if count_bases(&query_aligned) == 0 {
        return None;
    }
    let query_trimmed_left = count_bases(&aln.query_aligned[..left]);
    let query_trimmed_right = count_bases(&aln.query_aligned[right..]);

    Some(Alignment {
        template_start: aln.template_start + trim,
        template_end: aln.template_end - trim,
        query_start: aln.query_start + query_trimmed_left,
        query_end: aln.query_end - query_trimmed_right,
        template_aligned: aln.template_aligned[left..right].to_vec(),
        query_aligned,
        ..aln
    })
}
