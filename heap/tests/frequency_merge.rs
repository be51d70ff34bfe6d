//! A prefix-code builder used as a client of the heap: frequencies are
//! negated so the rarest symbol groups come out of `top` first.

use dheap::{DHeap, Entry, HeapError};
use std::collections::BTreeMap;

const TEXT: &str = "fffeeeeeddddddcccccccbbbbbbbbbbbbbbbbbbbbbbaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

#[derive(Debug)]
enum Tree {
    Leaf(char),
    Node(Box<Tree>, Box<Tree>),
}

#[derive(Debug)]
struct Group {
    symbols: String,
    tree: Tree,
}

fn frequencies(text: &str) -> BTreeMap<char, i64> {
    let mut freq = BTreeMap::new();
    for c in text.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }
    freq
}

fn frequency_heap(freq: &BTreeMap<char, i64>) -> DHeap<Group> {
    freq.iter()
        .map(|(&c, &n)| {
            let group = Group {
                symbols: c.to_string(),
                tree: Tree::Leaf(c),
            };
            (group, -n)
        })
        .collect()
}

fn merge(mut heap: DHeap<Group>) -> Result<Entry<Group>, HeapError> {
    while heap.len() > 1 {
        let right = heap.top()?;
        let left = heap.top()?;
        let merged = Group {
            symbols: left.element.symbols + &right.element.symbols,
            tree: Tree::Node(Box::new(left.element.tree), Box::new(right.element.tree)),
        };
        heap.insert(merged, left.priority + right.priority);
        assert!(heap.validate());
    }
    heap.top()
}

fn codes(tree: &Tree, prefix: String, out: &mut BTreeMap<char, String>) {
    match tree {
        Tree::Leaf(c) => {
            out.insert(*c, prefix);
        }
        Tree::Node(left, right) => {
            codes(left, format!("{prefix}0"), out);
            codes(right, format!("{prefix}1"), out);
        }
    }
}

#[test]
fn counts_symbols() {
    let freq = frequencies(TEXT);
    let expected = [('a', 57), ('b', 22), ('c', 7), ('d', 6), ('e', 5), ('f', 3)];
    assert_eq!(freq.into_iter().collect::<Vec<_>>(), expected);
}

#[test]
fn rarest_symbols_come_out_first() -> Result<(), HeapError> {
    let mut heap = frequency_heap(&frequencies(TEXT));
    assert!(heap.validate());

    for (symbol, priority) in [("f", -3), ("e", -5), ("d", -6), ("c", -7), ("b", -22), ("a", -57)] {
        let entry = heap.top()?;
        assert_eq!(entry.element.symbols, symbol);
        assert_eq!(entry.priority, priority);
    }
    assert!(heap.is_empty());
    Ok(())
}

#[test]
fn merge_builds_prefix_codes() -> Result<(), HeapError> {
    let root = merge(frequency_heap(&frequencies(TEXT)))?;
    assert_eq!(root.element.symbols, "abcdef");
    assert_eq!(root.priority, -100);

    let mut table = BTreeMap::new();
    codes(&root.element.tree, String::new(), &mut table);
    let expected = [
        ('a', "0"),
        ('b', "10"),
        ('c', "1100"),
        ('d', "1101"),
        ('e', "1110"),
        ('f', "1111"),
    ];
    for (symbol, code) in expected {
        assert_eq!(table[&symbol], code);
    }
    Ok(())
}

#[test]
fn merge_of_empty_input_fails() {
    let heap = frequency_heap(&BTreeMap::new());
    assert!(matches!(merge(heap), Err(HeapError::Empty)));
}
