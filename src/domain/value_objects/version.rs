//! Package version value object
//!
//! `[epoch:]pkgver[-pkgrel]`, ordered the way the host package manager
//! orders versions (alpm `vercmp`): epoch first, then segment-wise
//! comparison of pkgver, then pkgrel when both sides carry one.

use std::cmp::Ordering;

#[derive(Debug, Clone, Eq)]
pub struct PackageVersion {
    epoch: u64,
    pkgver: String,
    pkgrel: Option<String>,
    raw: String,
}

impl PackageVersion {
    pub fn parse(raw: &str) -> Self {
        let (epoch, rest) = match raw.split_once(':') {
            Some((e, rest)) if !e.is_empty() && e.bytes().all(|b| b.is_ascii_digit()) => {
                (e.parse().unwrap_or(0), rest)
            }
            _ => (0, raw),
        };
        let (pkgver, pkgrel) = match rest.rsplit_once('-') {
            Some((ver, rel)) => (ver.to_string(), Some(rel.to_string())),
            None => (rest.to_string(), None),
        };
        Self {
            epoch,
            pkgver,
            pkgrel,
            raw: raw.to_string(),
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn pkgver(&self) -> &str {
        &self.pkgver
    }

    pub fn pkgrel(&self) -> Option<&str> {
        self.pkgrel.as_deref()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl std::fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for PackageVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for PackageVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackageVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| segment_cmp(&self.pkgver, &other.pkgver))
            .then_with(|| match (&self.pkgrel, &other.pkgrel) {
                (Some(a), Some(b)) => segment_cmp(a, b),
                _ => Ordering::Equal,
            })
    }
}

/// Segment-wise comparison: runs of digits compare numerically, runs of
/// letters lexically, a numeric run beats an alphabetic one, and a longer
/// separator run wins.
pub fn segment_cmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    let one = a.as_bytes();
    let two = b.as_bytes();
    let (mut i, mut j) = (0usize, 0usize);

    while i < one.len() && j < two.len() {
        let (sep_i, sep_j) = (i, j);
        while i < one.len() && !one[i].is_ascii_alphanumeric() {
            i += 1;
        }
        while j < two.len() && !two[j].is_ascii_alphanumeric() {
            j += 1;
        }
        if i >= one.len() || j >= two.len() {
            break;
        }
        if i - sep_i != j - sep_j {
            return (i - sep_i).cmp(&(j - sep_j));
        }

        let (start_i, start_j) = (i, j);
        let numeric = one[i].is_ascii_digit();
        if numeric {
            while i < one.len() && one[i].is_ascii_digit() {
                i += 1;
            }
            while j < two.len() && two[j].is_ascii_digit() {
                j += 1;
            }
        } else {
            while i < one.len() && one[i].is_ascii_alphabetic() {
                i += 1;
            }
            while j < two.len() && two[j].is_ascii_alphabetic() {
                j += 1;
            }
        }

        if j == start_j {
            return if numeric {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        let mut seg_a = &a[start_i..i];
        let mut seg_b = &b[start_j..j];
        if numeric {
            seg_a = seg_a.trim_start_matches('0');
            seg_b = seg_b.trim_start_matches('0');
            match seg_a.len().cmp(&seg_b.len()) {
                Ordering::Equal => {}
                other => return other,
            }
        }
        match seg_a.cmp(seg_b) {
            Ordering::Equal => {}
            other => return other,
        }
    }

    let rest_a = i >= one.len();
    let rest_b = j >= two.len();
    if rest_a && rest_b {
        return Ordering::Equal;
    }
    // A trailing alphabetic run never beats an exhausted string.
    if (rest_a && !two[j].is_ascii_alphabetic()) || (!rest_a && one[i].is_ascii_alphabetic()) {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}
