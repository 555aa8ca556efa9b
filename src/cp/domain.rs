//! Bounds domains used during propagation and search.

use super::variables::VarId;

/// Raised when a domain becomes empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict;

/// Three-valued truth of a constraint under the current domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truth {
    /// Holds for every assignment left in the domains.
    True,
    /// Holds for no assignment left in the domains.
    False,
    /// Not decided yet.
    Unknown,
}

/// `[min, max]` interval per variable.
///
/// The search keeps one `Domains` per open node; cloning it is the
/// snapshot taken before branching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domains {
    bounds: Vec<(i64, i64)>,
}

impl Domains {
    pub fn new(bounds: Vec<(i64, i64)>) -> Self {
        Self { bounds }
    }

    #[inline]
    pub fn min(&self, var: VarId) -> i64 {
        self.bounds[var.0].0
    }

    #[inline]
    pub fn max(&self, var: VarId) -> i64 {
        self.bounds[var.0].1
    }

    #[inline]
    pub fn is_fixed(&self, var: VarId) -> bool {
        let (lo, hi) = self.bounds[var.0];
        lo == hi
    }

    /// The value of a fixed variable.
    pub fn value(&self, var: VarId) -> Option<i64> {
        let (lo, hi) = self.bounds[var.0];
        (lo == hi).then_some(lo)
    }

    /// Raises the lower bound. Returns whether the domain changed.
    pub fn set_min(&mut self, var: VarId, value: i64) -> Result<bool, Conflict> {
        let (lo, hi) = &mut self.bounds[var.0];
        if value <= *lo {
            return Ok(false);
        }
        if value > *hi {
            return Err(Conflict);
        }
        *lo = value;
        Ok(true)
    }

    /// Lowers the upper bound. Returns whether the domain changed.
    pub fn set_max(&mut self, var: VarId, value: i64) -> Result<bool, Conflict> {
        let (lo, hi) = &mut self.bounds[var.0];
        if value >= *hi {
            return Ok(false);
        }
        if value < *lo {
            return Err(Conflict);
        }
        *hi = value;
        Ok(true)
    }

    /// Fixes the variable to `value`.
    pub fn fix(&mut self, var: VarId, value: i64) -> Result<bool, Conflict> {
        let raised = self.set_min(var, value)?;
        let lowered = self.set_max(var, value)?;
        Ok(raised || lowered)
    }

    /// Values of all variables, if every variable is fixed.
    pub fn assignment(&self) -> Option<Vec<i64>> {
        self.bounds
            .iter()
            .map(|&(lo, hi)| (lo == hi).then_some(lo))
            .collect()
    }
}

/// `floor(n / d)` for any non-zero `d`.
pub(crate) fn floor_div(n: i64, d: i64) -> i64 {
    let q = n / d;
    if (n % d != 0) && ((n < 0) != (d < 0)) {
        q - 1
    } else {
        q
    }
}

/// `ceil(n / d)` for any non-zero `d`.
pub(crate) fn ceil_div(n: i64, d: i64) -> i64 {
    let q = n / d;
    if (n % d != 0) && ((n < 0) == (d < 0)) {
        q + 1
    } else {
        q
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_updates() {
        let mut d = Domains::new(vec![(0, 5), (2, 2)]);
        let x = VarId(0);
        let y = VarId(1);

        assert!(d.is_fixed(y));
        assert_eq!(d.value(y), Some(2));
        assert_eq!(d.value(x), None);

        assert_eq!(d.set_min(x, 1), Ok(true));
        assert_eq!(d.set_min(x, 1), Ok(false));
        assert_eq!(d.set_max(x, 3), Ok(true));
        assert_eq!((d.min(x), d.max(x)), (1, 3));

        assert_eq!(d.set_min(x, 4), Err(Conflict));
        assert_eq!(d.set_max(x, 0), Err(Conflict));
    }

    #[test]
    fn test_fix_and_assignment() {
        let mut d = Domains::new(vec![(0, 3), (1, 1)]);
        assert!(d.assignment().is_none());
        assert_eq!(d.fix(VarId(0), 2), Ok(true));
        assert_eq!(d.assignment(), Some(vec![2, 1]));
        assert_eq!(d.fix(VarId(1), 0), Err(Conflict));
    }

    #[test]
    fn test_rounding_division() {
        assert_eq!(floor_div(7, 2), 3);
        assert_eq!(floor_div(-7, 2), -4);
        assert_eq!(floor_div(7, -2), -4);
        assert_eq!(floor_div(-7, -2), 3);
        assert_eq!(floor_div(6, 3), 2);

        assert_eq!(ceil_div(7, 2), 4);
        assert_eq!(ceil_div(-7, 2), -3);
        assert_eq!(ceil_div(7, -2), -3);
        assert_eq!(ceil_div(-7, -2), 4);
        assert_eq!(ceil_div(-6, 3), -2);
    }
}
