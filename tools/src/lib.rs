//! Inspection and debugging tools for the bindata codec.
//!
//! This crate provides utilities for understanding what the codec does with
//! a type:
//!
//! - Print the compiled wire layout and its fingerprint
//! - Write encoded sample values
//! - Decode encoded files back into readable values
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to understand what the codec is doing.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueEnum;
use codec::{deserialize_exact, serialize, CodecCache, CodecResult, CompiledCodec, Layout};
use demo_types::{Customer, Order, OrderLine, OrderStatus, Tier};
use serde::Serialize;

/// The demo types the tools know how to handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DemoType {
    Customer,
    Order,
    OrderLine,
    Tier,
    OrderStatus,
}

impl DemoType {
    pub const ALL: [Self; 5] = [
        Self::Customer,
        Self::Order,
        Self::OrderLine,
        Self::Tier,
        Self::OrderStatus,
    ];

    pub fn codec(self, cache: &CodecCache) -> CodecResult<Arc<CompiledCodec>> {
        match self {
            Self::Customer => cache.get_or_build::<Customer>(),
            Self::Order => cache.get_or_build::<Order>(),
            Self::OrderLine => cache.get_or_build::<OrderLine>(),
            Self::Tier => cache.get_or_build::<Tier>(),
            Self::OrderStatus => cache.get_or_build::<OrderStatus>(),
        }
    }

    /// Encodes a deterministic sample value.
    pub fn sample_bytes(self, seed: u64) -> CodecResult<Vec<u8>> {
        match self {
            Self::Customer => serialize(&demo_types::sample_customer(seed)),
            Self::Order => serialize(&demo_types::sample_order(seed, 3)),
            Self::OrderLine => serialize(&demo_types::sample_line(seed)),
            Self::Tier => serialize(&demo_types::sample_customer(seed).tier),
            Self::OrderStatus => serialize(&demo_types::sample_order(seed, 0).status),
        }
    }

    /// Decodes `bytes`, which must hold exactly one value.
    pub fn decode(self, bytes: &[u8]) -> Result<Decoded> {
        match self {
            Self::Customer => Decoded::new::<Customer>(bytes),
            Self::Order => Decoded::new::<Order>(bytes),
            Self::OrderLine => Decoded::new::<OrderLine>(bytes),
            Self::Tier => Decoded::new::<Tier>(bytes),
            Self::OrderStatus => Decoded::new::<OrderStatus>(bytes),
        }
    }
}

/// A decoded value in both machine and human form.
#[derive(Debug)]
pub struct Decoded {
    pub json: serde_json::Value,
    pub debug: String,
}

impl Decoded {
    fn new<T>(bytes: &[u8]) -> Result<Self>
    where
        T: codec::BinType + Serialize + std::fmt::Debug,
    {
        let value: T = deserialize_exact(bytes).context("decode value")?;
        Ok(Self {
            json: serde_json::to_value(&value).context("convert to json")?,
            debug: format!("{value:#?}"),
        })
    }
}

/// A compiled codec's description.
#[derive(Debug, Serialize)]
pub struct LayoutReport {
    pub type_name: &'static str,
    pub shape: &'static str,
    pub fingerprint: String,
    pub presence_wrapped: bool,
    pub fixed_size: Option<usize>,
    pub layout: Layout,
}

pub fn layout_report(codec: &CompiledCodec) -> LayoutReport {
    LayoutReport {
        type_name: codec.type_name(),
        shape: codec.shape(),
        fingerprint: format!("0x{:016x}", codec.fingerprint()),
        presence_wrapped: codec.is_presence_wrapped(),
        fixed_size: codec.layout().fixed_size(),
        layout: codec.layout().clone(),
    }
}

pub fn format_layout_pretty(report: &LayoutReport) -> String {
    let mut out = format!(
        "type: {}\nshape: {} fingerprint: {}\n",
        report.type_name, report.shape, report.fingerprint
    );
    if let Some(size) = report.fixed_size {
        out.push_str(&format!("fixed size: {size} bytes\n"));
    }
    out.push_str("layout:\n");
    for line in report.layout.to_string().lines() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    out
}
