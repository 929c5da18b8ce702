#![no_main]

use codec::{deserialize_with_limits, serialize, CodecLimits};
use demo_types::Order;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let limits = CodecLimits::for_testing();
    if let Ok(orders) = deserialize_with_limits::<Vec<Order>>(data, &limits) {
        // Absent members decode to empty values, so compare after one round trip.
        let bytes = serialize(&orders).expect("decoded value re-encodes");
        let again = deserialize_with_limits::<Vec<Order>>(&bytes, &limits).expect("re-decodes");
        assert_eq!(again, orders);
    }
});
