use ergo_runtime::libs::io::Console;
use ergo_runtime::runtime::array::{arr_add, arr_get, arr_len, arr_new, arr_remove, arr_set};
use ergo_runtime::runtime::closure::{call, fn_new_with_env};
use ergo_runtime::runtime::object::{cell_get, cell_new, cell_set, obj_new};
use ergo_runtime::runtime::rc::{move_into, release, retain, take};
use ergo_runtime::runtime::string::{str_from_parts, str_lit, to_string};
use ergo_runtime::runtime::{ops, stats, Value};

fn text(v: &Value) -> String {
    v.as_str().to_string_lossy().into_owned()
}

fn first_capture(env: &[Value], _args: &[Value]) -> Value {
    env[0].clone()
}

fn add_captured(env: &[Value], args: &[Value]) -> Value {
    ops::add(&env[0], &args[0])
}

#[test]
fn stringification_round_trips() {
    assert_eq!(text(&to_string(&Value::Int(42))), "42");
    assert_eq!(text(&to_string(&Value::Float(3.5))), "3.500000");
    assert_eq!(text(&to_string(&Value::Bool(true))), "true");
}

#[test]
fn array_scenario_with_ownership() {
    let before = stats::snapshot();
    {
        let arr = arr_new(0);
        arr_add(&arr, Value::Int(1));
        arr_add(&arr, Value::Int(2));
        arr_add(&arr, Value::Int(3));
        assert_eq!(arr_len(&arr), 3);
        assert_eq!(arr_get(&arr, 1), Value::Int(2));

        let removed = arr_remove(&arr, 0);
        assert_eq!(removed, Value::Int(1));
        assert_eq!(arr_len(&arr), 2);
        assert_eq!(arr_get(&arr, 0), Value::Int(2));

        arr_set(&arr, 1, str_lit("three"));
        assert_eq!(text(&arr_get(&arr, 1)), "three");
    }
    assert_eq!(stats::snapshot().since(&before).live(), 0);
}

#[test]
fn writef_and_readf_examples() {
    let mut out = Vec::new();
    Console::writef_to(&mut out, &str_lit("x={}"), &[Value::Int(5)]).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "x=5");

    let scanned = Console::scanf(
        &str_lit("{} {}"),
        &str_lit("3 4"),
        &[Value::Int(0), Value::Int(0)],
    )
    .unwrap();
    assert_eq!(scanned.as_array().to_vec(), vec![Value::Int(3), Value::Int(4)]);
}

#[test]
fn closure_env_is_freed_exactly_once_in_a_loop() {
    let before = stats::snapshot();
    for i in 0..1_000 {
        let captured = str_lit("ten");
        let f = fn_new_with_env(first_capture, 0, vec![Value::Int(10), captured]);
        assert_eq!(call(&f, &[]), Value::Int(10));
        assert_eq!(call(&f, &[]), Value::Int(10));

        let g = fn_new_with_env(add_captured, 1, vec![Value::Int(i)]);
        assert_eq!(call(&g, &[Value::Int(1)]), Value::Int(i + 1));

        release(f);
        release(g);
    }
    let counts = stats::snapshot().since(&before);
    assert_eq!(counts.closures.allocated, 2_000);
    assert_eq!(counts.closures.freed, 2_000);
    assert_eq!(counts.strings.freed, 1_000);
    assert_eq!(counts.live(), 0);
}

#[test]
fn division_rules() {
    assert_eq!(ops::div(&Value::Int(7), &Value::Int(2)), Value::Int(3));
    assert_eq!(ops::div(&Value::Float(7.0), &Value::Int(2)), Value::Float(3.5));
}

#[test]
fn retain_release_move_protocol_balances() {
    let before = stats::snapshot();
    {
        let mut local = str_from_parts(&[str_lit("a"), Value::Int(1)]);
        let stored = retain(&local);
        assert_eq!(local.ref_count(), Some(2));

        let moved = take(&mut local);
        assert!(local.is_null());
        assert_eq!(moved.ref_count(), Some(2));
        release(local);

        let mut slot = Value::Null;
        move_into(&mut slot, moved);
        assert_eq!(slot.ref_count(), Some(2));
        release(stored);
        assert_eq!(slot.ref_count(), Some(1));
    }
    assert_eq!(stats::snapshot().since(&before).live(), 0);
}

#[test]
fn nested_containers_release_recursively() {
    let before = stats::snapshot();
    {
        let outer = arr_new(0);
        let inner = arr_new(0);
        arr_add(&inner, str_lit("deep"));
        arr_add(&inner, cell_new(str_lit("cell")));
        arr_add(&outer, inner);
        arr_add(&outer, fn_new_with_env(first_capture, 0, vec![arr_new(1)]));
        arr_add(&outer, obj_new("marker", 7u32));
        assert_eq!(stats::snapshot().since(&before).live(), 8);
    }
    assert_eq!(stats::snapshot().since(&before).live(), 0);
}

#[test]
fn state_cell_shared_between_closures() {
    fn bump(env: &[Value], _args: &[Value]) -> Value {
        let next = ops::add(&cell_get(&env[0]), &Value::Int(1));
        cell_set(&env[0], next.clone());
        next
    }

    let counter = cell_new(Value::Int(0));
    let a = fn_new_with_env(bump, 0, vec![retain(&counter)]);
    let b = fn_new_with_env(bump, 0, vec![retain(&counter)]);
    call(&a, &[]);
    call(&b, &[]);
    assert_eq!(call(&a, &[]), Value::Int(3));
    assert_eq!(cell_get(&counter), Value::Int(3));
}
