//! # Batched 3-vector algebra
//!
//! [`Vector3Batch`] stores N three-dimensional vectors as three contiguous component
//! arrays (structure of arrays). Every operation works elementwise over the whole batch
//! and returns a new value; nothing here mutates its inputs or can fail.
//!
//! Zero-length batches are valid and produce empty results.
//!
//! The only non-trivial operation is [`Vector3Batch::euler_rotation`], which maps
//! orbital-plane coordinates (x toward pericenter, z along the angular momentum) into the
//! reference frame through the classical 3-1-3 rotation `Rz(Ω) · Rx(i) · Rz(ω)`.
use std::ops::{Add, Mul, Neg, Sub};

use itertools::izip;
use nalgebra::{Rotation3, Vector3};

/// N three-dimensional vectors stored component-wise.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vector3Batch {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl Vector3Batch {
    /// Build a batch from its three component arrays.
    ///
    /// Panics if the arrays differ in length; callers validate lengths before
    /// reaching the algebra layer.
    pub fn new(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> Self {
        assert!(
            x.len() == y.len() && y.len() == z.len(),
            "component arrays of a Vector3Batch must share one length"
        );
        Vector3Batch { x, y, z }
    }

    /// Batch of `len` zero vectors.
    pub fn zeros(len: usize) -> Self {
        Vector3Batch {
            x: vec![0.0; len],
            y: vec![0.0; len],
            z: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Vector of body `index` as a `nalgebra` vector.
    pub fn get(&self, index: usize) -> Vector3<f64> {
        Vector3::new(self.x[index], self.y[index], self.z[index])
    }

    /// Iterate over the bodies as `nalgebra` vectors.
    pub fn iter(&self) -> impl Iterator<Item = Vector3<f64>> + '_ {
        izip!(&self.x, &self.y, &self.z).map(|(&x, &y, &z)| Vector3::new(x, y, z))
    }

    /// Apply `f` to every vector of the batch.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: FnMut(Vector3<f64>) -> Vector3<f64>,
    {
        self.iter().map(f).collect()
    }

    /// Dot product per body.
    pub fn dot(&self, other: &Vector3Batch) -> Vec<f64> {
        izip!(&self.x, &self.y, &self.z, &other.x, &other.y, &other.z)
            .map(|(x1, y1, z1, x2, y2, z2)| x1 * x2 + y1 * y2 + z1 * z2)
            .collect()
    }

    /// Cross product per body.
    pub fn cross(&self, other: &Vector3Batch) -> Vector3Batch {
        izip!(&self.x, &self.y, &self.z, &other.x, &other.y, &other.z)
            .map(|(x1, y1, z1, x2, y2, z2)| {
                Vector3::new(y1 * z2 - z1 * y2, z1 * x2 - x1 * z2, x1 * y2 - y1 * x2)
            })
            .collect()
    }

    /// Euclidean norm per body.
    pub fn norm(&self) -> Vec<f64> {
        izip!(&self.x, &self.y, &self.z)
            .map(|(x, y, z)| x.hypot(*y).hypot(*z))
            .collect()
    }

    /// Squared norm per body.
    pub fn norm_squared(&self) -> Vec<f64> {
        self.dot(self)
    }

    /// Multiply every vector by one scalar.
    pub fn scale(&self, factor: f64) -> Vector3Batch {
        Vector3Batch {
            x: self.x.iter().map(|v| v * factor).collect(),
            y: self.y.iter().map(|v| v * factor).collect(),
            z: self.z.iter().map(|v| v * factor).collect(),
        }
    }

    /// Multiply vector `i` by `factors[i]`.
    pub fn scale_each(&self, factors: &[f64]) -> Vector3Batch {
        Vector3Batch {
            x: self.x.iter().zip(factors).map(|(v, f)| v * f).collect(),
            y: self.y.iter().zip(factors).map(|(v, f)| v * f).collect(),
            z: self.z.iter().zip(factors).map(|(v, f)| v * f).collect(),
        }
    }

    /// Divide vector `i` by `divisors[i]`.
    pub fn div_each(&self, divisors: &[f64]) -> Vector3Batch {
        Vector3Batch {
            x: self.x.iter().zip(divisors).map(|(v, d)| v / d).collect(),
            y: self.y.iter().zip(divisors).map(|(v, d)| v / d).collect(),
            z: self.z.iter().zip(divisors).map(|(v, d)| v / d).collect(),
        }
    }

    /// Rotate orbital-plane vectors into the reference frame.
    ///
    /// The rotation of body `i` is `Rz(node[i]) · Rx(inc[i]) · Rz(arg[i])`: first by
    /// the argument of pericenter about the orbit normal, then by the inclination about
    /// the line of nodes, then by the longitude of the ascending node about the
    /// reference pole.
    ///
    /// Arguments
    /// -----------------
    /// * `arg`: Argument of pericenter ω per body (radians).
    /// * `inc`: Inclination i per body (radians).
    /// * `node`: Longitude of the ascending node Ω per body (radians).
    ///
    /// Return
    /// ----------
    /// * The rotated batch, same length as `self`.
    pub fn euler_rotation(&self, arg: &[f64], inc: &[f64], node: &[f64]) -> Vector3Batch {
        izip!(self.iter(), arg, inc, node)
            .map(|(v, &w, &i, &o)| {
                let rot = Rotation3::from_axis_angle(&Vector3::z_axis(), o)
                    * Rotation3::from_axis_angle(&Vector3::x_axis(), i)
                    * Rotation3::from_axis_angle(&Vector3::z_axis(), w);
                rot * v
            })
            .collect()
    }
}

impl FromIterator<Vector3<f64>> for Vector3Batch {
    fn from_iter<T: IntoIterator<Item = Vector3<f64>>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let mut batch = Vector3Batch {
            x: Vec::with_capacity(lower),
            y: Vec::with_capacity(lower),
            z: Vec::with_capacity(lower),
        };
        for v in iter {
            batch.x.push(v.x);
            batch.y.push(v.y);
            batch.z.push(v.z);
        }
        batch
    }
}

impl Add for &Vector3Batch {
    type Output = Vector3Batch;

    fn add(self, rhs: &Vector3Batch) -> Vector3Batch {
        Vector3Batch {
            x: self.x.iter().zip(&rhs.x).map(|(a, b)| a + b).collect(),
            y: self.y.iter().zip(&rhs.y).map(|(a, b)| a + b).collect(),
            z: self.z.iter().zip(&rhs.z).map(|(a, b)| a + b).collect(),
        }
    }
}

impl Sub for &Vector3Batch {
    type Output = Vector3Batch;

    fn sub(self, rhs: &Vector3Batch) -> Vector3Batch {
        Vector3Batch {
            x: self.x.iter().zip(&rhs.x).map(|(a, b)| a - b).collect(),
            y: self.y.iter().zip(&rhs.y).map(|(a, b)| a - b).collect(),
            z: self.z.iter().zip(&rhs.z).map(|(a, b)| a - b).collect(),
        }
    }
}

impl Mul<f64> for &Vector3Batch {
    type Output = Vector3Batch;

    fn mul(self, rhs: f64) -> Vector3Batch {
        self.scale(rhs)
    }
}

impl Neg for &Vector3Batch {
    type Output = Vector3Batch;

    fn neg(self) -> Vector3Batch {
        self.scale(-1.0)
    }
}
