#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pacta::{Error, Promise, Semigroup};
    use serde_json::json;
    use std::{sync::Once, thread, time::Duration};

    static TRACING: Once = Once::new();

    fn init_tracing() {
        TRACING.call_once(|| {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .with_test_writer()
                .try_init();
        });
    }

    /// A promise resolved with `value` from another thread after `ms`.
    fn later<T: Clone + Send + 'static>(ms: u64, value: T) -> Promise<T> {
        let promise = Promise::new();
        let producer = promise.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(ms));
            producer.resolve(value).unwrap();
        });
        promise
    }

    fn foo() -> Promise<String> {
        later(50, String::from("foo"))
    }

    fn bar() -> Promise<String> {
        later(25, String::from("bar"))
    }

    fn baz() -> Promise<String> {
        later(75, String::from("baz"))
    }

    fn get<T: Clone + Send + 'static>(promise: Promise<T>) -> T {
        block_on(promise.wait()).unwrap()
    }

    fn f(x: String) -> String {
        format!("f({x})")
    }

    fn g(x: String) -> String {
        format!("g({x})")
    }

    #[test]
    fn test_of_wraps_a_value() {
        assert_eq!(get(Promise::of(1).map(|x| x)), 1);
    }

    #[test]
    fn test_map_yields_the_value() {
        init_tracing();
        assert_eq!(get(foo().map(|x| x)), "foo");
    }

    #[test]
    fn test_map_yields_the_value_after_resolution() {
        let p = foo();
        let done = Promise::new();
        let (q, d) = (p.clone(), done.clone());
        p.register(move |_| {
            // `p` is still dispatching, so this joins the back of its queue.
            q.register(move |x| d.resolve(x).unwrap());
        });
        assert_eq!(get(done), "foo");

        // Registered once `p` is resolved and its queue is empty.
        assert!(p.is_resolved());
        let late = Promise::new();
        let l = late.clone();
        p.register(move |x| l.resolve(x).unwrap());
        assert_eq!(late.peek().as_deref(), Some("foo"));
        assert_eq!(get(p.map(|x| x + "!")), "foo!");
    }

    #[test]
    fn test_map_can_be_chained() {
        assert_eq!(get(foo().map(|x| x + "!")), "foo!");
    }

    #[test]
    fn test_map_can_be_nested() {
        let (p, p2, p3) = (foo(), bar(), baz());
        let done = Promise::new();
        let d = done.clone();
        p.register(move |x| {
            p2.register(move |y| {
                p3.register(move |z| d.resolve(vec![x, y, z]).unwrap());
            });
        });
        assert_eq!(get(done), vec!["foo", "bar", "baz"]);
    }

    #[test]
    fn test_functor_identity() {
        assert_eq!(get(foo().map(|x| x)), "foo");
    }

    #[test]
    fn test_functor_composition() {
        let p = foo();
        let composed = p.map(|x| f(g(x)));
        let sequenced = p.map(g).map(f);
        assert_eq!(get(composed), "f(g(foo))");
        assert_eq!(get(sequenced), "f(g(foo))");
    }

    #[test]
    fn test_concat_associativity_of_sequences() {
        let (p, p2, p3) = (Promise::of(vec![1]), Promise::of(vec![2]), Promise::of(vec![3]));
        assert_eq!(get(p.concat(&p2).concat(&p3)), vec![1, 2, 3]);
        assert_eq!(get(p.concat(&p2.concat(&p3))), vec![1, 2, 3]);
    }

    #[test]
    fn test_concat_any_monoid_including_strings() {
        assert_eq!(get(foo().concat(&bar()).concat(&baz())), "foobarbaz");
    }

    #[test]
    fn test_chain_associativity() {
        let f = |x: String| Promise::of(format!("f({x})"));
        let g = |x: String| Promise::of(format!("g({x})"));
        let p = foo();
        assert_eq!(get(p.chain(f).chain(g)), "g(f(foo))");
        assert_eq!(get(p.chain(move |x| f(x).chain(g))), "g(f(foo))");
    }

    #[test]
    fn test_chain_waits_for_the_inner_promise() {
        let p = Promise::of(String::from("foo"));
        let q = p.chain(|x| later(30, x + "!"));
        assert_eq!(q.peek(), None);
        assert_eq!(get(q), "foo!");
    }

    #[test]
    fn test_applicative_identity() {
        assert_eq!(get(Promise::of(|a: String| a).ap(&foo())), "foo");
    }

    #[test]
    fn test_applicative_composition() {
        type Fun = fn(String) -> String;
        let u: Promise<Fun> = Promise::of(|x| format!("u({x})"));
        let v: Promise<Fun> = Promise::of(|x| format!("v({x})"));
        let w = Promise::of(String::from("foo"));

        let compose = Promise::of(|f: Fun| move |g: Fun| move |x: String| f(g(x)));
        assert_eq!(get(compose.ap(&u).ap(&v).ap(&w)), "u(v(foo))");
        assert_eq!(get(u.ap(&v.ap(&w))), "u(v(foo))");
    }

    #[test]
    fn test_applicative_homomorphism() {
        let lhs = Promise::of(f as fn(String) -> String).ap(&Promise::of(String::from("foo")));
        let rhs = Promise::of(f(String::from("foo")));
        assert_eq!(get(lhs), "f(foo)");
        assert_eq!(get(rhs), "f(foo)");
    }

    #[test]
    fn test_applicative_interchange() {
        let u = Promise::of(|x: String| format!("u({x})"));
        let y = String::from("y");
        let lhs = u.ap(&Promise::of(y.clone()));
        let rhs = Promise::of(move |f: fn(String) -> String| f(y)).ap(&u.map(|u| u as fn(String) -> String));
        assert_eq!(get(lhs), "u(y)");
        assert_eq!(get(rhs), "u(y)");
    }

    #[test]
    fn test_ap_with_late_operands() {
        let fun = later(40, |x: String| x.to_uppercase());
        assert_eq!(get(fun.ap(&bar())), "BAR");
    }

    #[test]
    fn test_empty_right_identity() {
        let p = Promise::of(vec![1]);
        assert_eq!(get(p.concat(&p.empty())), vec![1]);
    }

    #[test]
    fn test_empty_left_identity() {
        let p = Promise::of(vec![1]);
        assert_eq!(get(p.empty().concat(&p)), vec![1]);
    }

    #[test]
    fn test_empty_of_pending_string() {
        let p = foo();
        assert_eq!(get(p.empty().concat(&p)), "foo");
        assert_eq!(get(p.concat(&p.empty())), "foo");
    }

    #[test]
    fn test_conjoin_regardless_of_type() {
        let joined = foo().conjoin(&bar()).conjoin(&baz());
        assert_eq!(get(joined), vec!["foo", "bar", "baz"]);
    }

    #[test]
    fn test_conjoin_even_if_already_a_list() {
        let (p, p2, p3) = (Promise::of(vec![1]), Promise::of(vec![2, 3]), Promise::of(vec![4]));
        assert_eq!(get(p.conjoin(&p2).conjoin(&p3)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_conjoin_mixed_types() {
        let p = later(50, json!("foo"));
        let p2 = Promise::of(json!([2, 3]));
        assert_eq!(get(p.conjoin(&p2)), vec![json!("foo"), json!(2), json!(3)]);
    }

    #[test]
    fn test_append_to_a_list() {
        assert_eq!(get(Promise::of(vec![1]).append(&Promise::of(2))), vec![1, 2]);
    }

    #[test]
    fn test_append_lists_without_joining_them() {
        let p = Promise::of(vec![json!(1)]);
        let p2 = Promise::of(json!([2]));
        assert_eq!(get(p.append(&p2)), vec![json!(1), json!([2])]);
    }

    #[test]
    fn test_append_can_be_chained() {
        let p = Promise::of(vec![])
            .append(&Promise::of(vec![1]))
            .append(&later(20, vec![2, 3]))
            .append(&Promise::of(vec![4]));
        assert_eq!(get(p), vec![vec![1], vec![2, 3], vec![4]]);
    }

    #[test]
    fn test_spread_calls_with_each_value() {
        let done = Promise::new();
        let d = done.clone();
        Promise::of([1, 2, 3]).spread(move |x: i32, y: i32, z: i32| d.resolve((x, y, z)).unwrap());
        assert_eq!(get(done), (1, 2, 3));
    }

    #[test]
    fn test_spread_returns_a_single_value() {
        let p = Promise::of([1, 2, 3]).spread(|x: i32, y: i32, z: i32| x + y + z);
        assert_eq!(get(p), 6);
    }

    #[test]
    fn test_spread_an_appended_list() {
        let p = Promise::of(vec![]).append(&foo()).append(&bar()).append(&baz());
        let joined = p.spread(|x: String, y: String, z: String| format!("{x}-{y}-{z}"));
        assert_eq!(get(joined), Ok(String::from("foo-bar-baz")));
        assert_eq!(get(p.spread(|x: String| x)), Err(Error::Arity { expected: 1, got: 3 }));
    }

    #[test]
    fn test_map_over_a_long_chain() {
        let p = later(10, 0_u64);
        let mut q = p.clone();
        for _ in 0..100_000 {
            q = q.map(|x| x + 1);
        }
        assert_eq!(get(q), 100_000);
    }

    #[test]
    fn test_reduce_returns_a_new_promise() {
        let p = Promise::of(vec![vec![1], vec![2], vec![3]]);
        assert_eq!(get(p.reduce(Semigroup::combine, None)), Ok(vec![1, 2, 3]));
    }

    #[test]
    fn test_reduce_takes_an_initial_value() {
        let p = Promise::of(vec![1, 2, 3]);
        assert_eq!(get(p.reduce(|acc, e| acc + e, Some(0))), Ok(6));
    }

    #[test]
    fn test_reduce_empty_without_initial_value() {
        let p = later(10, Vec::<i32>::new());
        assert_eq!(get(p.reduce(|acc, e| acc + e, None)), Err(Error::EmptyReduce));
    }

    #[test]
    fn test_double_resolve_is_reported() {
        init_tracing();
        let p = foo();
        assert_eq!(get(p.clone()), "foo");
        assert_eq!(p.resolve(String::from("again")), Err(Error::AlreadyResolved));
        assert_eq!(get(p.map(|x| x)), "foo");
    }
}
