use std::fmt;
use std::iter::FromIterator;
use std::ops;

/// A single CSV row.
///
/// All of a row's cells are stored in one contiguous `String`, along with
/// the offset at which each cell ends. Reusing a `Row` across reads (see
/// `Reader::read_row`) therefore amortizes its allocations.
///
/// A row read from CSV data always has at least one cell.
#[derive(Clone, Default)]
pub struct Row {
    text: String,
    bounds: Bounds,
}

impl Row {
    /// Create a new empty `Row`.
    pub fn new() -> Row {
        Row::default()
    }

    /// Create a new empty `Row` with room for `bytes` bytes of cell text and
    /// `cells` cells.
    pub fn with_capacity(bytes: usize, cells: usize) -> Row {
        Row {
            text: String::with_capacity(bytes),
            bounds: Bounds { ends: Vec::with_capacity(cells) },
        }
    }

    /// Return the cell at index `i`.
    ///
    /// If no cell at index `i` exists, then this returns `None`.
    #[inline]
    pub fn get(&self, i: usize) -> Option<&str> {
        self.bounds.get(i).map(|range| &self.text[range])
    }

    /// Returns true if this row has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of cells in this row.
    #[inline]
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    /// Remove every cell, keeping the allocations.
    #[inline]
    pub fn clear(&mut self) {
        self.text.clear();
        self.bounds.ends.clear();
    }

    /// Shorten this row to at most `n` cells.
    pub fn truncate(&mut self, n: usize) {
        if n < self.len() {
            self.bounds.ends.truncate(n);
            let end = self.bounds.end();
            self.text.truncate(end);
        }
    }

    /// Add a new cell to the end of this row.
    #[inline]
    pub fn push_field(&mut self, cell: &str) {
        self.text.push_str(cell);
        self.bounds.ends.push(self.text.len());
    }

    /// Return an iterator over the cells of this row.
    pub fn iter(&self) -> RowIter<'_> {
        RowIter { row: self, i: 0, last_end: 0 }
    }

    /// The concatenated text of all cells.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// The end offsets of the cells in a row.
#[derive(Clone, Debug, Default)]
struct Bounds {
    /// The ending index of each cell. Always on a UTF-8 boundary.
    ends: Vec<usize>,
}

impl Bounds {
    /// Returns the bounds of cell `i`.
    fn get(&self, i: usize) -> Option<ops::Range<usize>> {
        let end = *self.ends.get(i)?;
        let start = match i.checked_sub(1) {
            None => 0,
            Some(prev) => self.ends[prev],
        };
        Some(start..end)
    }

    /// Return the end of the last cell, or `0` if there are none.
    fn end(&self) -> usize {
        self.ends.last().copied().unwrap_or(0)
    }

    fn len(&self) -> usize {
        self.ends.len()
    }
}

impl ops::Index<usize> for Row {
    type Output = str;

    #[inline]
    fn index(&self, i: usize) -> &str {
        match self.bounds.get(i) {
            Some(range) => &self.text[range],
            None => panic!(
                "index out of bounds: row has {} cells but index is {}",
                self.len(),
                i
            ),
        }
    }
}

impl<'a> IntoIterator for &'a Row {
    type IntoIter = RowIter<'a>;
    type Item = &'a str;

    fn into_iter(self) -> RowIter<'a> {
        self.iter()
    }
}

/// An iterator over the cells in a row.
#[derive(Clone)]
pub struct RowIter<'a> {
    row: &'a Row,
    i: usize,
    last_end: usize,
}

impl<'a> Iterator for RowIter<'a> {
    type Item = &'a str;

    #[inline]
    fn next(&mut self) -> Option<&'a str> {
        let end = *self.row.bounds.ends.get(self.i)?;
        let start = self.last_end;
        self.i += 1;
        self.last_end = end;
        Some(&self.row.text[start..end])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.row.len() - self.i;
        (n, Some(n))
    }
}

impl<'a> ExactSizeIterator for RowIter<'a> {}

impl<T: AsRef<str>> From<Vec<T>> for Row {
    fn from(cells: Vec<T>) -> Row {
        Row::from_iter(cells)
    }
}

impl<'a> From<&'a [&'a str]> for Row {
    fn from(cells: &'a [&'a str]) -> Row {
        Row::from_iter(cells)
    }
}

impl<T: AsRef<str>> FromIterator<T> for Row {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Row {
        let mut row = Row::new();
        row.extend(iter);
        row
    }
}

impl<T: AsRef<str>> Extend<T> for Row {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for cell in iter {
            self.push_field(cell.as_ref());
        }
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Row) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for Row {}

impl<T: AsRef<str>> PartialEq<Vec<T>> for Row {
    fn eq(&self, other: &Vec<T>) -> bool {
        self.iter().eq(other.iter().map(|c| c.as_ref()))
    }
}

impl<T: AsRef<str>> PartialEq<[T]> for Row {
    fn eq(&self, other: &[T]) -> bool {
        self.iter().eq(other.iter().map(|c| c.as_ref()))
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
