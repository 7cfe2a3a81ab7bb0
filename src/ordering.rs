use std::cmp::Ordering;

/// Total order over file names.
pub type NameOrder = fn(&str, &str) -> Ordering;

/// Natural ("human") comparison of two file names.
///
/// Digit runs compare by value, other text compares case-insensitively.
/// Ties fall back to fewer leading zeros first and then to a plain byte
/// comparison, so distinct names never compare equal.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Chunks::new(a);
    let mut right = Chunks::new(b);
    let mut tie = Ordering::Equal;

    loop {
        let (l, r) = match (left.next(), right.next()) {
            (None, None) => break,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => (l, r),
        };

        let ord = match (l, r) {
            (Chunk::Digits(l), Chunk::Digits(r)) => {
                let l_trimmed = l.trim_start_matches('0');
                let r_trimmed = r.trim_start_matches('0');
                let by_value = l_trimmed
                    .len()
                    .cmp(&r_trimmed.len())
                    .then_with(|| l_trimmed.cmp(r_trimmed));
                if by_value == Ordering::Equal && tie == Ordering::Equal {
                    tie = l.len().cmp(&r.len());
                }
                by_value
            }
            (Chunk::Text(l), Chunk::Text(r)) => cmp_ignore_case(l, r),
            (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    tie.then_with(|| a.cmp(b))
}

/// Sort names in place with the given order.
pub fn sort_names(names: &mut [String], order: NameOrder) {
    names.sort_by(|a, b| order(a, b));
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    let a = a.chars().flat_map(char::to_lowercase);
    let b = b.chars().flat_map(char::to_lowercase);
    a.cmp(b)
}

#[derive(Debug, Clone, Copy)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Chunks<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(self.rest.len());
        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(if digits {
            Chunk::Digits(chunk)
        } else {
            Chunk::Text(chunk)
        })
    }
}
