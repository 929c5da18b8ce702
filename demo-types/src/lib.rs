//! Demo record types for the bindata tools and benchmarks.
//!
//! The same types derive `serde` so benchmarks can compare against `bincode`
//! on identical data.

use codec::{BinEnum, BinType, Member, Record, TypeInfo};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tier {
    Suspended = -1,
    #[default]
    Standard = 0,
    Silver = 1,
    Gold = 2,
}

impl BinEnum for Tier {
    type Repr = i8;

    fn to_repr(self) -> i8 {
        self as i8
    }

    fn from_repr(repr: i8) -> Option<Self> {
        match repr {
            -1 => Some(Self::Suspended),
            0 => Some(Self::Standard),
            1 => Some(Self::Silver),
            2 => Some(Self::Gold),
            _ => None,
        }
    }
}

impl BinType for Tier {
    fn type_info() -> TypeInfo {
        TypeInfo::enumeration::<Self>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending = 0,
    Paid = 10,
    Shipped = 20,
    Delivered = 30,
    Cancelled = 500,
}

impl BinEnum for OrderStatus {
    type Repr = u16;

    fn to_repr(self) -> u16 {
        self as u16
    }

    fn from_repr(repr: u16) -> Option<Self> {
        match repr {
            0 => Some(Self::Pending),
            10 => Some(Self::Paid),
            20 => Some(Self::Shipped),
            30 => Some(Self::Delivered),
            500 => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl BinType for OrderStatus {
    fn type_info() -> TypeInfo {
        TypeInfo::enumeration::<Self>()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Customer {
    pub id: u64,
    pub name: String,
    pub email: Option<String>,
    pub tier: Tier,
    pub tags: Vec<String>,
    pub avatar: Vec<u8>,
    /// Derived from `name`; never encoded.
    pub initials: String,
}

impl BinType for Customer {
    fn type_info() -> TypeInfo {
        Record::<Self>::new()
            .member(Member::property("id", |c: &Customer| &c.id, |c: &mut Customer, v| c.id = v))
            .member(Member::property("name", |c: &Customer| &c.name, |c: &mut Customer, v| {
                c.name = v;
            }))
            .member(Member::property("email", |c: &Customer| &c.email, |c: &mut Customer, v| {
                c.email = v;
            }))
            .member(Member::property("tier", |c: &Customer| &c.tier, |c: &mut Customer, v| {
                c.tier = v;
            }))
            .member(Member::property("tags", |c: &Customer| &c.tags, |c: &mut Customer, v| {
                c.tags = v;
            }))
            .member(Member::property("avatar", |c: &Customer| &c.avatar, |c: &mut Customer, v| {
                c.avatar = v;
            }))
            .member(Member::read_only("initials", |c: &Customer| &c.initials))
            .into_type_info()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrderLine {
    pub sku: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub discount_pct: Option<u8>,
}

impl BinType for OrderLine {
    fn type_info() -> TypeInfo {
        Record::<Self>::new()
            .member(Member::property("sku", |l: &OrderLine| &l.sku, |l: &mut OrderLine, v| {
                l.sku = v;
            }))
            .member(Member::property(
                "quantity",
                |l: &OrderLine| &l.quantity,
                |l: &mut OrderLine, v| l.quantity = v,
            ))
            .member(Member::property(
                "unit_price_cents",
                |l: &OrderLine| &l.unit_price_cents,
                |l: &mut OrderLine, v| l.unit_price_cents = v,
            ))
            .member(Member::property(
                "discount_pct",
                |l: &OrderLine| &l.discount_pct,
                |l: &mut OrderLine, v| l.discount_pct = v,
            ))
            .into_type_info()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub customer: Customer,
    pub lines: Vec<OrderLine>,
    pub status: OrderStatus,
    /// Latitude and longitude in micro-degrees.
    pub ship_to: Option<(i32, i32)>,
    pub placed_at: i64,
    pub note: Option<String>,
    pub revision: u16,
}

impl BinType for Order {
    fn type_info() -> TypeInfo {
        Record::<Self>::new()
            .member(Member::property("id", |o: &Order| &o.id, |o: &mut Order, v| o.id = v))
            .member(Member::property("customer", |o: &Order| &o.customer, |o: &mut Order, v| {
                o.customer = v;
            }))
            .member(Member::property("lines", |o: &Order| &o.lines, |o: &mut Order, v| {
                o.lines = v;
            }))
            .member(Member::property("status", |o: &Order| &o.status, |o: &mut Order, v| {
                o.status = v;
            }))
            .member(Member::property("ship_to", |o: &Order| &o.ship_to, |o: &mut Order, v| {
                o.ship_to = v;
            }))
            .member(Member::property("placed_at", |o: &Order| &o.placed_at, |o: &mut Order, v| {
                o.placed_at = v;
            }))
            .member(Member::property("note", |o: &Order| &o.note, |o: &mut Order, v| o.note = v))
            .member(
                Member::field("revision", |o: &Order| &o.revision, |o: &mut Order, v| {
                    o.revision = v;
                })
                .serialized(),
            )
            .into_type_info()
    }
}

const NAMES: [&str; 6] = ["Ada", "Grace", "Linus", "Barbara", "Ken", "Margaret"];
const SKUS: [&str; 4] = ["KB-101", "MS-220", "HD-4K", "CBL-USB-C"];

pub fn sample_customer(seed: u64) -> Customer {
    let name = NAMES[(seed % NAMES.len() as u64) as usize];
    let tier = match seed % 4 {
        0 => Tier::Standard,
        1 => Tier::Silver,
        2 => Tier::Gold,
        _ => Tier::Suspended,
    };
    Customer {
        id: 1_000 + seed,
        name: format!("{name} #{seed}"),
        email: (seed % 3 != 0).then(|| format!("{}@example.com", name.to_lowercase())),
        tier,
        tags: (0..seed % 3).map(|i| format!("tag-{i}")).collect(),
        avatar: (0..(seed % 5) * 8).map(|b| (b * 31 + seed) as u8).collect(),
        initials: name.chars().take(1).collect(),
    }
}

pub fn sample_line(seed: u64) -> OrderLine {
    OrderLine {
        sku: SKUS[(seed % SKUS.len() as u64) as usize].to_string(),
        quantity: 1 + (seed % 7) as u32,
        unit_price_cents: 499 + (seed as i64 % 10) * 250,
        discount_pct: (seed % 4 == 0).then_some(10),
    }
}

pub fn sample_order(seed: u64, lines: usize) -> Order {
    let status = match seed % 5 {
        0 => OrderStatus::Pending,
        1 => OrderStatus::Paid,
        2 => OrderStatus::Shipped,
        3 => OrderStatus::Delivered,
        _ => OrderStatus::Cancelled,
    };
    Order {
        id: 50_000 + seed,
        customer: sample_customer(seed),
        lines: (0..lines as u64).map(|i| sample_line(seed + i)).collect(),
        status,
        ship_to: (seed % 2 == 0).then_some((52_520_008, 13_404_954)),
        placed_at: 1_700_000_000 + seed as i64 * 60,
        note: (seed % 3 == 1).then(|| "leave at the door".to_string()),
        revision: (seed % 4) as u16,
    }
}

pub fn sample_orders(count: usize) -> Vec<Order> {
    (0..count as u64).map(|seed| sample_order(seed, 1 + (seed % 5) as usize)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec::{deserialize, serialize, CodecCache, Layout};

    #[test]
    fn orders_round_trip() {
        for order in sample_orders(12) {
            let bytes = serialize(&order).unwrap();
            let decoded: Order = deserialize(&bytes).unwrap();
            let expected = Order {
                customer: Customer {
                    initials: String::new(),
                    ..order.customer.clone()
                },
                ..order
            };
            assert_eq!(decoded, expected);
        }
    }

    #[test]
    fn enums_use_their_repr() {
        assert_eq!(serialize(&Tier::Suspended).unwrap(), vec![0x7F]);
        assert_eq!(serialize(&OrderStatus::Cancelled).unwrap(), vec![0xF4, 0x01]);
    }

    #[test]
    fn customer_skips_read_only_initials() {
        let codec = CodecCache::new().get_or_build::<Customer>().unwrap();
        let Layout::Record { members, .. } = codec.layout() else {
            panic!("expected record");
        };
        let names: Vec<&str> = members.iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["id", "name", "email", "tier", "tags", "avatar"]);
    }

    #[test]
    fn samples_are_deterministic() {
        assert_eq!(sample_order(7, 3), sample_order(7, 3));
        assert_eq!(sample_orders(4).len(), 4);
    }
}
