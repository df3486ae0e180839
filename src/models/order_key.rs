/// Manual-order keys — exact decimal numbers of unbounded precision.
///
/// A room placed by hand inside a manually sorted tag carries an `OrderKey`.
/// Dropping a room between two neighbours assigns the exact midpoint of their
/// keys, so any number of nested insertions between the same two rooms stays
/// strictly ordered without renumbering the rest of the list. Binary floats
/// collapse after ~50 such halvings; these keys only grow one digit per halving.
///
/// Keys are stored normalized (no leading integer zeros, no trailing fraction
/// zeros, zero is never negative), so derived equality matches numeric equality.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderKeyError {
    #[error("Order key is empty")]
    Empty,

    #[error("Invalid character in order key: {0:?}")]
    InvalidDigit(char),

    #[error("Order key has more than one decimal point")]
    MisplacedPoint,
}

// ---------------------------------------------------------------------------
// OrderKey
// ---------------------------------------------------------------------------

/// `value = (-1)^negative * digits / 10^scale`
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderKey {
    negative: bool,
    /// Magnitude, most significant digit first. Empty means zero.
    digits: Vec<u8>,
    /// How many of `digits` sit after the decimal point.
    scale: u32,
}

impl OrderKey {
    pub fn zero() -> Self {
        OrderKey {
            negative: false,
            digits: Vec::new(),
            scale: 0,
        }
    }

    pub fn one() -> Self {
        OrderKey::from_int(1)
    }

    pub fn from_int(value: i64) -> Self {
        let digits = value
            .unsigned_abs()
            .to_string()
            .bytes()
            .map(|b| b - b'0')
            .collect();
        OrderKey {
            negative: value < 0,
            digits,
            scale: 0,
        }
        .normalized()
    }

    /// Parse a plain decimal string such as `"50"`, `"-3"`, `"0.125"` or `".5"`.
    pub fn parse(s: &str) -> Result<Self, OrderKeyError> {
        let s = s.trim();
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let mut digits = Vec::with_capacity(body.len());
        let mut scale = 0u32;
        let mut seen_point = false;
        for c in body.chars() {
            match c {
                '0'..='9' => {
                    digits.push(c as u8 - b'0');
                    if seen_point {
                        scale += 1;
                    }
                }
                '.' if seen_point => return Err(OrderKeyError::MisplacedPoint),
                '.' => seen_point = true,
                other => return Err(OrderKeyError::InvalidDigit(other)),
            }
        }

        if digits.is_empty() {
            return Err(OrderKeyError::Empty);
        }

        Ok(OrderKey {
            negative,
            digits,
            scale,
        }
        .normalized())
    }

    pub fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_positive(&self) -> bool {
        !self.negative && !self.is_zero()
    }

    /// Number of fractional digits. Grows by at most one per midpoint.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn negated(&self) -> Self {
        OrderKey {
            negative: !self.negative,
            digits: self.digits.clone(),
            scale: self.scale,
        }
        .normalized()
    }

    pub fn add(&self, other: &OrderKey) -> OrderKey {
        let scale = self.scale.max(other.scale);
        let a = self.aligned(scale);
        let b = other.aligned(scale);

        let (negative, digits) = if self.negative == other.negative {
            (self.negative, mag_add(&a, &b))
        } else {
            match mag_cmp(&a, &b) {
                Ordering::Greater => (self.negative, mag_sub(&a, &b)),
                Ordering::Less => (other.negative, mag_sub(&b, &a)),
                Ordering::Equal => return OrderKey::zero(),
            }
        };

        OrderKey {
            negative,
            digits,
            scale,
        }
        .normalized()
    }

    pub fn sub(&self, other: &OrderKey) -> OrderKey {
        self.add(&other.negated())
    }

    pub fn plus_one(&self) -> OrderKey {
        self.add(&OrderKey::one())
    }

    pub fn minus_one(&self) -> OrderKey {
        self.sub(&OrderKey::one())
    }

    /// Exact `self / 2`.
    pub fn halve(&self) -> OrderKey {
        if self.is_zero() {
            return OrderKey::zero();
        }

        // Shift one decimal place first so the last digit is even and the
        // long division below never leaves a remainder.
        let mut shifted = self.digits.clone();
        shifted.push(0);

        let mut quotient = Vec::with_capacity(shifted.len());
        let mut rem = 0u8;
        for d in shifted {
            let cur = rem * 10 + d;
            quotient.push(cur / 2);
            rem = cur % 2;
        }
        debug_assert_eq!(rem, 0);

        OrderKey {
            negative: self.negative,
            digits: quotient,
            scale: self.scale + 1,
        }
        .normalized()
    }

    /// Exact midpoint of two keys.
    pub fn midpoint(a: &OrderKey, b: &OrderKey) -> OrderKey {
        a.add(b).halve()
    }

    /// Key for a room dropped between `prev` and `next` (either may be absent
    /// at the ends of the list).
    ///
    /// - both present: exact midpoint
    /// - only `next`: halfway to zero when `next` is positive, else `next - 1`
    /// - only `prev`: `prev + 1`
    /// - neither: zero
    ///
    /// Equal neighbours yield their shared value; the comparator's room-id
    /// tie-break then decides placement.
    pub fn between(prev: Option<&OrderKey>, next: Option<&OrderKey>) -> OrderKey {
        match (prev, next) {
            (Some(p), Some(n)) => OrderKey::midpoint(p, n),
            (None, Some(n)) if n.is_positive() => OrderKey::midpoint(&OrderKey::zero(), n),
            (None, Some(n)) => n.minus_one(),
            (Some(p), None) => p.plus_one(),
            (None, None) => OrderKey::zero(),
        }
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    /// Magnitude digits rescaled to `scale` fractional places.
    fn aligned(&self, scale: u32) -> Vec<u8> {
        if self.is_zero() {
            return Vec::new();
        }
        let mut digits = self.digits.clone();
        digits.extend(std::iter::repeat(0).take((scale - self.scale) as usize));
        digits
    }

    fn normalized(mut self) -> Self {
        let leading = self.digits.iter().take_while(|d| **d == 0).count();
        self.digits.drain(..leading);

        while self.scale > 0 && self.digits.last() == Some(&0) {
            self.digits.pop();
            self.scale -= 1;
        }

        if self.digits.is_empty() {
            self.negative = false;
            self.scale = 0;
        }
        self
    }

    fn signum(&self) -> i8 {
        if self.is_zero() {
            0
        } else if self.negative {
            -1
        } else {
            1
        }
    }
}

// ---------------------------------------------------------------------------
// Magnitude arithmetic (big-endian decimal digit vectors, equal scale)
// ---------------------------------------------------------------------------

fn trim_leading(digits: &[u8]) -> &[u8] {
    let leading = digits.iter().take_while(|d| **d == 0).count();
    &digits[leading..]
}

fn mag_cmp(a: &[u8], b: &[u8]) -> Ordering {
    let a = trim_leading(a);
    let b = trim_leading(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn mag_add(a: &[u8], b: &[u8]) -> Vec<u8> {
    let len = a.len().max(b.len());
    let mut out = Vec::with_capacity(len + 1);
    let mut carry = 0u8;
    for i in 0..len {
        let da = if i < a.len() { a[a.len() - 1 - i] } else { 0 };
        let db = if i < b.len() { b[b.len() - 1 - i] } else { 0 };
        let sum = da + db + carry;
        out.push(sum % 10);
        carry = sum / 10;
    }
    if carry > 0 {
        out.push(carry);
    }
    out.reverse();
    out
}

/// `a - b`, requires `a >= b`.
fn mag_sub(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(a.len());
    let mut borrow = 0i8;
    for i in 0..a.len() {
        let da = a[a.len() - 1 - i] as i8;
        let db = if i < b.len() { b[b.len() - 1 - i] as i8 } else { 0 };
        let mut diff = da - db - borrow;
        if diff < 0 {
            diff += 10;
            borrow = 1;
        } else {
            borrow = 0;
        }
        out.push(diff as u8);
    }
    debug_assert_eq!(borrow, 0);
    out.reverse();
    trim_leading(&out).to_vec()
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_sign = self.signum().cmp(&other.signum());
        if by_sign != Ordering::Equal || self.is_zero() {
            return by_sign;
        }
        let scale = self.scale.max(other.scale);
        let by_magnitude = mag_cmp(&self.aligned(scale), &other.aligned(scale));
        if self.negative {
            by_magnitude.reverse()
        } else {
            by_magnitude
        }
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Default for OrderKey {
    fn default() -> Self {
        OrderKey::zero()
    }
}

impl FromStr for OrderKey {
    type Err = OrderKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderKey::parse(s)
    }
}

impl TryFrom<String> for OrderKey {
    type Error = OrderKeyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        OrderKey::parse(&s)
    }
}

impl From<OrderKey> for String {
    fn from(key: OrderKey) -> Self {
        key.to_string()
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }

        let mut out = String::with_capacity(self.digits.len() + 3);
        if self.negative {
            out.push('-');
        }
        let scale = self.scale as usize;
        let push_digits = |out: &mut String, digits: &[u8]| {
            out.extend(digits.iter().map(|d| char::from(b'0' + d)));
        };

        if self.digits.len() > scale {
            let split = self.digits.len() - scale;
            push_digits(&mut out, &self.digits[..split]);
            if scale > 0 {
                out.push('.');
                push_digits(&mut out, &self.digits[split..]);
            }
        } else {
            out.push_str("0.");
            out.extend(std::iter::repeat('0').take(scale - self.digits.len()));
            push_digits(&mut out, &self.digits);
        }

        f.write_str(&out)
    }
}

impl fmt::Debug for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OrderKey({})", self)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
