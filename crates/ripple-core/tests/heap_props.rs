use proptest::prelude::*;
use ripple_core::IndexedMinHeap;

#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i32),
    Pop,
}

fn op_strategy(key_space: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..key_space, -1000i32..1000).prop_map(|(k, v)| Op::Insert(k, v)),
        1 => Just(Op::Pop),
    ]
}

proptest! {
    /// Popped values are monotone non-decreasing between mutations, and the
    /// position index agrees with a reference map at every step.
    #[test]
    fn heap_matches_reference_model(ops in proptest::collection::vec(op_strategy(24), 1..200)) {
        let mut heap = IndexedMinHeap::new(24);
        let mut model = std::collections::HashMap::<usize, i32>::new();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    heap.insert_or_update(k, v);
                    model.insert(k, v);
                }
                Op::Pop => {
                    if model.is_empty() {
                        continue;
                    }
                    let min = *model.values().min().unwrap();
                    prop_assert_eq!(heap.top_value(), Some(min));
                    let popped = heap.pop();
                    prop_assert_eq!(model.get(&popped), Some(&min));
                    model.remove(&popped);
                }
            }

            prop_assert_eq!(heap.len(), model.len());
            for k in 0..24 {
                prop_assert_eq!(heap.contains(k), model.contains_key(&k));
                prop_assert_eq!(heap.value_of(k), model.get(&k).copied());
            }
        }

        // Drain: the full pop sequence is sorted.
        let mut last = i32::MIN;
        while !heap.is_empty() {
            let v = heap.top_value().unwrap();
            prop_assert!(v >= last);
            last = v;
            heap.pop();
        }
    }
}
