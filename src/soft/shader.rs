//! Instruction lists and their interpreter.
//!
//! Programs are pre-built vectors of [`Instr`]; there is no assembler. Register files follow
//! the shader unit: 16 inputs `v`, 16 temporaries `r`, 96 float uniforms `c` and 8 outputs `o`.

use crate::color::classify::FpClass;
use crate::foundation::core::Vec4;
use crate::foundation::error::{ConformError, ConformResult};
use crate::soft::alu;

/// Input registers.
pub const INPUT_REGISTERS: usize = 16;
/// Temporary registers.
pub const TEMP_REGISTERS: usize = 16;
/// Float uniform registers.
pub const FLOAT_UNIFORMS: usize = 96;
/// Output registers.
pub const OUTPUT_REGISTERS: usize = 8;

/// Output register carrying the clip-space position.
pub const OUT_POSITION: u8 = 0;
/// Output register carrying the vertex color.
pub const OUT_COLOR: u8 = 1;

/// Readable register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reg {
    /// Vertex input `v0..v15`.
    Input(u8),
    /// Temporary `r0..r15`.
    Temp(u8),
    /// Float uniform `c0..c95`.
    Uniform(u8),
}

/// Writable register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DstReg {
    /// Temporary `r0..r15`.
    Temp(u8),
    /// Output `o0..o7`.
    Output(u8),
}

/// Component selection, one source index per destination lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Swizzle(pub [u8; 4]);

impl Swizzle {
    /// `.xyzw`
    pub const XYZW: Self = Self([0, 1, 2, 3]);
    /// `.xxxx`
    pub const XXXX: Self = Self([0, 0, 0, 0]);
    /// `.yyyy`
    pub const YYYY: Self = Self([1, 1, 1, 1]);
    /// `.zzzz`
    pub const ZZZZ: Self = Self([2, 2, 2, 2]);
    /// `.wwww`
    pub const WWWW: Self = Self([3, 3, 3, 3]);

    fn apply(self, v: Vec4) -> Vec4 {
        let a = v.to_array();
        Vec4::from_array(self.0.map(|i| a[usize::from(i & 3)]))
    }
}

/// Destination write mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mask(pub u8);

impl Mask {
    /// `.x`
    pub const X: Self = Self(0b0001);
    /// `.y`
    pub const Y: Self = Self(0b0010);
    /// `.z`
    pub const Z: Self = Self(0b0100);
    /// `.w`
    pub const W: Self = Self(0b1000);
    /// `.xy`
    pub const XY: Self = Self(0b0011);
    /// `.zw`
    pub const ZW: Self = Self(0b1100);
    /// `.xyz`
    pub const XYZ: Self = Self(0b0111);
    /// `.xyzw`
    pub const XYZW: Self = Self(0b1111);

    fn merge(self, old: Vec4, new: Vec4) -> Vec4 {
        let (o, n) = (old.to_array(), new.to_array());
        Vec4::from_array(std::array::from_fn(|i| {
            if self.0 & (1 << i) != 0 { n[i] } else { o[i] }
        }))
    }
}

/// Source operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Src {
    /// Register read.
    pub reg: Reg,
    /// Component selection.
    pub swizzle: Swizzle,
    /// Negate every component after swizzling.
    pub negate: bool,
}

impl Src {
    /// Read `reg` unswizzled.
    pub const fn new(reg: Reg) -> Self {
        Self {
            reg,
            swizzle: Swizzle::XYZW,
            negate: false,
        }
    }

    /// Replace the swizzle.
    pub const fn swz(mut self, swizzle: Swizzle) -> Self {
        self.swizzle = swizzle;
        self
    }

    /// Negated operand.
    pub const fn neg(mut self) -> Self {
        self.negate = !self.negate;
        self
    }
}

/// Destination operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dst {
    /// Register written.
    pub reg: DstReg,
    /// Components written.
    pub mask: Mask,
}

impl Dst {
    /// Write every component of `reg`.
    pub const fn new(reg: DstReg) -> Self {
        Self {
            reg,
            mask: Mask::XYZW,
        }
    }

    /// Replace the write mask.
    pub const fn mask(mut self, mask: Mask) -> Self {
        self.mask = mask;
        self
    }
}

/// One-operand operations. `rcp`, `rsq`, `ex2` and `lg2` read `.x` and broadcast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    /// Copy.
    Mov,
    /// Reciprocal.
    Rcp,
    /// Reciprocal square root.
    Rsq,
    /// Floor, per component.
    Flr,
    /// Base-2 exponent.
    Ex2,
    /// Base-2 logarithm.
    Lg2,
}

/// Two-operand operations. Dot products broadcast their scalar result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    /// Per-component add.
    Add,
    /// Per-component multiply.
    Mul,
    /// Per-component minimum.
    Min,
    /// Per-component maximum.
    Max,
    /// Per-component `a >= b`.
    Sge,
    /// `sge` with the inverted operand encoding.
    Sgei,
    /// Per-component `a < b`.
    Slt,
    /// `slt` with the inverted operand encoding.
    Slti,
    /// Three-component dot product.
    Dp3,
    /// Four-component dot product.
    Dp4,
    /// `a.xyz . b.xyz + b.w`.
    Dph,
}

/// One instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Instr {
    /// `op dst, src`
    Unary {
        /// Operation.
        op: UnaryOp,
        /// Destination.
        dst: Dst,
        /// Operand.
        src: Src,
    },
    /// `op dst, a, b`
    Binary {
        /// Operation.
        op: BinaryOp,
        /// Destination.
        dst: Dst,
        /// First operand.
        a: Src,
        /// Second operand.
        b: Src,
    },
    /// `mad dst, a, b, c`
    Mad {
        /// Destination.
        dst: Dst,
        /// Multiplicand.
        a: Src,
        /// Multiplier.
        b: Src,
        /// Addend.
        c: Src,
    },
    /// Run the arm indexed by `selector.x`; non-integral or out-of-range values run nothing.
    Switch {
        /// Selector operand.
        selector: Src,
        /// Arms indexed by selector value.
        arms: Vec<Vec<Instr>>,
    },
    /// Write the marker color of `src.x`'s class into `dst.xyz` and `1.0` into `dst.w`.
    Classify {
        /// Destination.
        dst: Dst,
        /// Scalar classified.
        src: Src,
    },
}

impl Instr {
    /// `op dst, src`
    pub const fn unary(op: UnaryOp, dst: Dst, src: Src) -> Self {
        Self::Unary { op, dst, src }
    }

    /// `op dst, a, b`
    pub const fn binary(op: BinaryOp, dst: Dst, a: Src, b: Src) -> Self {
        Self::Binary { op, dst, a, b }
    }
}

/// A loaded program: code, baked-in constants and the uniform names it exposes.
#[derive(Clone, Debug, PartialEq)]
pub struct Program {
    /// Name the program is registered under.
    pub name: &'static str,
    /// Uniform names and the float register each occupies.
    pub uniforms: &'static [(&'static str, u8)],
    /// Constant registers loaded when the program is bound.
    pub constants: Vec<(u8, Vec4)>,
    /// Code, run once per vertex.
    pub code: Vec<Instr>,
}

impl Program {
    /// Register of uniform `name`.
    pub fn uniform_register(&self, name: &str) -> Option<u8> {
        self.uniforms
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, reg)| reg)
    }

    /// Run the program for one vertex.
    pub fn execute(
        &self,
        uniforms: &[Vec4; FLOAT_UNIFORMS],
        inputs: &[Vec4; INPUT_REGISTERS],
    ) -> ConformResult<[Vec4; OUTPUT_REGISTERS]> {
        let mut unit = Unit {
            uniforms,
            inputs,
            temps: [Vec4::ZERO; TEMP_REGISTERS],
            outputs: [Vec4::ZERO; OUTPUT_REGISTERS],
        };
        unit.run(&self.code)?;
        Ok(unit.outputs)
    }
}

struct Unit<'a> {
    uniforms: &'a [Vec4; FLOAT_UNIFORMS],
    inputs: &'a [Vec4; INPUT_REGISTERS],
    temps: [Vec4; TEMP_REGISTERS],
    outputs: [Vec4; OUTPUT_REGISTERS],
}

fn out_of_range(kind: &str, index: u8) -> ConformError {
    ConformError::pipeline(format!("{kind} register {index} out of range"))
}

impl Unit<'_> {
    fn read(&self, src: Src) -> ConformResult<Vec4> {
        let raw = match src.reg {
            Reg::Input(i) => self
                .inputs
                .get(usize::from(i))
                .ok_or_else(|| out_of_range("input", i))?,
            Reg::Temp(i) => self
                .temps
                .get(usize::from(i))
                .ok_or_else(|| out_of_range("temp", i))?,
            Reg::Uniform(i) => self
                .uniforms
                .get(usize::from(i))
                .ok_or_else(|| out_of_range("uniform", i))?,
        };
        let v = src.swizzle.apply(*raw);
        Ok(if src.negate {
            Vec4::from_array(v.to_array().map(|c| -c))
        } else {
            v
        })
    }

    fn write(&mut self, dst: Dst, value: Vec4) -> ConformResult<()> {
        let slot = match dst.reg {
            DstReg::Temp(i) => self
                .temps
                .get_mut(usize::from(i))
                .ok_or_else(|| out_of_range("temp", i))?,
            DstReg::Output(i) => self
                .outputs
                .get_mut(usize::from(i))
                .ok_or_else(|| out_of_range("output", i))?,
        };
        *slot = dst.mask.merge(*slot, value);
        Ok(())
    }

    fn run(&mut self, code: &[Instr]) -> ConformResult<()> {
        for instr in code {
            match instr {
                Instr::Unary { op, dst, src } => {
                    let v = self.read(*src)?;
                    self.write(*dst, unary(*op, v))?;
                }
                Instr::Binary { op, dst, a, b } => {
                    let (a, b) = (self.read(*a)?, self.read(*b)?);
                    self.write(*dst, binary(*op, a, b))?;
                }
                Instr::Mad { dst, a, b, c } => {
                    let (a, b, c) = (self.read(*a)?, self.read(*b)?, self.read(*c)?);
                    let (a, b, c) = (a.to_array(), b.to_array(), c.to_array());
                    let v = std::array::from_fn(|i| alu::mad(a[i], b[i], c[i]));
                    self.write(*dst, Vec4::from_array(v))?;
                }
                Instr::Switch { selector, arms } => {
                    let s = self.read(*selector)?.x;
                    if let Some(arm) = arm_index(s).and_then(|i| arms.get(i)) {
                        self.run(arm)?;
                    }
                }
                Instr::Classify { dst, src } => {
                    let [r, g, b] = FpClass::of(self.read(*src)?.x).marker();
                    self.write(*dst, Vec4::new(r, g, b, 1.0))?;
                }
            }
        }
        Ok(())
    }
}

fn arm_index(s: f32) -> Option<usize> {
    if s.is_finite() && s >= 0.0 && s.fract() == 0.0 {
        Some(s as usize)
    } else {
        None
    }
}

fn unary(op: UnaryOp, v: Vec4) -> Vec4 {
    let scalar = |f: fn(f32) -> f32| Vec4::splat(f(v.x));
    match op {
        UnaryOp::Mov => v,
        UnaryOp::Rcp => scalar(alu::rcp),
        UnaryOp::Rsq => scalar(alu::rsq),
        UnaryOp::Flr => Vec4::from_array(v.to_array().map(alu::flr)),
        UnaryOp::Ex2 => scalar(alu::ex2),
        UnaryOp::Lg2 => scalar(alu::lg2),
    }
}

fn binary(op: BinaryOp, a: Vec4, b: Vec4) -> Vec4 {
    let (x, y) = (a.to_array(), b.to_array());
    let lanes = |f: fn(f32, f32) -> f32| Vec4::from_array(std::array::from_fn(|i| f(x[i], y[i])));
    match op {
        BinaryOp::Add => lanes(alu::add),
        BinaryOp::Mul => lanes(alu::mul),
        BinaryOp::Min => lanes(alu::min),
        BinaryOp::Max => lanes(alu::max),
        BinaryOp::Sge | BinaryOp::Sgei => lanes(alu::sge),
        BinaryOp::Slt | BinaryOp::Slti => lanes(alu::slt),
        BinaryOp::Dp3 => Vec4::splat(alu::dot(&x[..3], &y[..3])),
        BinaryOp::Dp4 => Vec4::splat(alu::dot(&x, &y)),
        BinaryOp::Dph => Vec4::splat(alu::add(alu::dot(&x[..3], &y[..3]), y[3])),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/soft/shader.rs"]
mod tests;
