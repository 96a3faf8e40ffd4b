// src/core/table.rs

//! The interned complex-value table with memoized arithmetic.
//!
//! All graph arithmetic routes through this table: a weight is a
//! [`ComplexId`], and because interned values are canonical, two weights are
//! the same ring value exactly when their indices are equal. Repeated
//! operations on the same operands are constant-time cache lookups.

use rustc_hash::FxHashMap;

use super::complex::{ComplexId, ComplexValue};
use super::error::QmddError;

/// Table of interned exact complex values.
///
/// The first nine indices are seeded constants, in a fixed order, so code
/// elsewhere can refer to them without a table lookup (e.g.
/// [`ComplexTable::ONE_OVER_SQRT_2`]).
#[derive(Debug, Clone)]
pub struct ComplexTable {
    values: Vec<ComplexValue>,
    lookup: FxHashMap<ComplexValue, ComplexId>,
    add_cache: FxHashMap<(ComplexId, ComplexId), ComplexId>,
    mul_cache: FxHashMap<(ComplexId, ComplexId), ComplexId>,
    div_cache: FxHashMap<(ComplexId, ComplexId), ComplexId>,
}

impl ComplexTable {
    /// Index of 0.
    pub const ZERO: ComplexId = ComplexId(0);
    /// Index of 1.
    pub const ONE: ComplexId = ComplexId(1);
    /// Index of 1/√2.
    pub const ONE_OVER_SQRT_2: ComplexId = ComplexId(2);
    /// Index of −1.
    pub const NEG_ONE: ComplexId = ComplexId(3);
    /// Index of i.
    pub const I: ComplexId = ComplexId(4);
    /// Index of −i.
    pub const NEG_I: ComplexId = ComplexId(5);
    /// Index of −1/√2.
    pub const NEG_ONE_OVER_SQRT_2: ComplexId = ComplexId(6);
    /// Index of e^(iπ/4) = (1+i)/√2.
    pub const EXP_I_PI_4: ComplexId = ComplexId(7);
    /// Index of e^(−iπ/4) = (1−i)/√2.
    pub const EXP_NEG_I_PI_4: ComplexId = ComplexId(8);

    /// Creates a table seeded with the nine well-known constants.
    pub fn new() -> Self {
        let mut table = Self {
            values: Vec::new(),
            lookup: FxHashMap::default(),
            add_cache: FxHashMap::default(),
            mul_cache: FxHashMap::default(),
            div_cache: FxHashMap::default(),
        };
        table.seed();
        table
    }

    /// Voids all entries and caches and reseeds the well-known constants.
    pub fn reset(&mut self) {
        self.values.clear();
        self.lookup.clear();
        self.add_cache.clear();
        self.mul_cache.clear();
        self.div_cache.clear();
        self.seed();
    }

    fn seed(&mut self) {
        let constants = [
            ComplexValue::zero(),                 // ZERO
            ComplexValue::one(),                  // ONE
            ComplexValue::new(0, 1, 0, 0, 1),     // 1/√2
            ComplexValue::new(-1, 0, 0, 0, 1),    // −1
            ComplexValue::new(0, 0, 1, 0, 1),     // i
            ComplexValue::new(0, 0, -1, 0, 1),    // −i
            ComplexValue::new(0, -1, 0, 0, 1),    // −1/√2
            ComplexValue::new(0, 1, 0, 1, 1),     // (1+i)/√2
            ComplexValue::new(0, 1, 0, -1, 1),    // (1−i)/√2
        ];
        for value in constants {
            self.intern(value);
        }
    }

    /// Number of interned values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the table is empty. Never true after construction.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Interns a canonical value, returning its stable index.
    pub fn intern(&mut self, value: ComplexValue) -> ComplexId {
        if let Some(&id) = self.lookup.get(&value) {
            return id;
        }
        let id = ComplexId(self.values.len() as u32);
        self.values.push(value);
        self.lookup.insert(value, id);
        id
    }

    /// Looks up the value behind an index.
    pub fn value(&self, id: ComplexId) -> Result<&ComplexValue, QmddError> {
        self.values.get(id.idx()).ok_or(QmddError::InvalidIndex {
            index: id.0,
            len: self.values.len() as u32,
        })
    }

    /// Unchecked access for engine-internal indices, which are interned by
    /// construction.
    pub(crate) fn val(&self, id: ComplexId) -> &ComplexValue {
        &self.values[id.idx()]
    }

    /// Interned sum of two values.
    pub fn add(&mut self, x: ComplexId, y: ComplexId) -> Result<ComplexId, QmddError> {
        self.value(x)?;
        self.value(y)?;
        if x == Self::ZERO {
            return Ok(y);
        }
        if y == Self::ZERO {
            return Ok(x);
        }
        // Addition commutes; key on the sorted pair so both orders share one entry.
        let key = (x.min(y), x.max(y));
        if let Some(&hit) = self.add_cache.get(&key) {
            return Ok(hit);
        }
        let sum = self.val(x).add(self.val(y));
        let id = self.intern(sum);
        self.add_cache.insert(key, id);
        Ok(id)
    }

    /// Interned product of two values.
    pub fn mul(&mut self, x: ComplexId, y: ComplexId) -> Result<ComplexId, QmddError> {
        self.value(x)?;
        self.value(y)?;
        if x == Self::ZERO || y == Self::ZERO {
            return Ok(Self::ZERO);
        }
        if x == Self::ONE {
            return Ok(y);
        }
        if y == Self::ONE {
            return Ok(x);
        }
        let key = (x.min(y), x.max(y));
        if let Some(&hit) = self.mul_cache.get(&key) {
            return Ok(hit);
        }
        let product = self.val(x).mul(self.val(y));
        let id = self.intern(product);
        self.mul_cache.insert(key, id);
        Ok(id)
    }

    /// Interned product of any number of values.
    pub fn mul_all(&mut self, ids: &[ComplexId]) -> Result<ComplexId, QmddError> {
        let (&first, rest) = ids.split_first().ok_or(QmddError::EmptyInput)?;
        let mut acc = first;
        self.value(acc)?;
        for &id in rest {
            acc = self.mul(acc, id)?;
        }
        Ok(acc)
    }

    /// Interned quotient `num / den`.
    ///
    /// `den = 0` fails with [`QmddError::DivByZero`]; `num = 0` returns zero
    /// without touching the cache.
    pub fn div(&mut self, num: ComplexId, den: ComplexId) -> Result<ComplexId, QmddError> {
        self.value(num)?;
        self.value(den)?;
        if den == Self::ZERO {
            return Err(QmddError::DivByZero);
        }
        if num == Self::ZERO {
            return Ok(Self::ZERO);
        }
        if den == Self::ONE {
            return Ok(num);
        }
        if num == den {
            return Ok(Self::ONE);
        }
        // Division does not commute; the key keeps operand order.
        let key = (num, den);
        if let Some(&hit) = self.div_cache.get(&key) {
            return Ok(hit);
        }
        let quotient = self.val(num).div(self.val(den));
        let id = self.intern(quotient);
        self.div_cache.insert(key, id);
        Ok(id)
    }

    /// First index among `ids` whose value has maximal squared magnitude.
    pub fn argmax(&self, ids: &[ComplexId]) -> Result<ComplexId, QmddError> {
        let (&first, rest) = ids.split_first().ok_or(QmddError::EmptyInput)?;
        let mut best = first;
        let mut best_mag = self.value(first)?.mag2();
        for &id in rest {
            let mag = self.value(id)?.mag2();
            if mag > best_mag {
                best = id;
                best_mag = mag;
            }
        }
        Ok(best)
    }

    /// Real part of an interned value.
    pub fn re(&self, id: ComplexId) -> Result<f64, QmddError> {
        Ok(self.value(id)?.re())
    }

    /// Imaginary part of an interned value.
    pub fn im(&self, id: ComplexId) -> Result<f64, QmddError> {
        Ok(self.value(id)?.im())
    }

    /// Squared magnitude of an interned value.
    pub fn mag2(&self, id: ComplexId) -> Result<f64, QmddError> {
        Ok(self.value(id)?.mag2())
    }
}

impl Default for ComplexTable {
    fn default() -> Self {
        Self::new()
    }
}
