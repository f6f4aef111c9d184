//! # Suite harness
//!
//! A minimal stand-in for a BDD host runner: nested `describe` scopes,
//! `before_each`/`after_each` hooks inherited by nested scopes, and `it`
//! tests. Hooks run outer to inner before a test and inner to outer after it.
//! Code inside a `describe` closure runs while the suite is being built,
//! the same way declarative code does in a real runner.

use futures::future::{FutureExt, LocalBoxFuture};
use std::future::Future;
use std::rc::Rc;

type Hook = Rc<dyn Fn()>;
type Body = Rc<dyn Fn() -> LocalBoxFuture<'static, ()>>;

/// One `describe` scope.
pub struct Suite {
    name: String,
    before_each: Vec<Hook>,
    after_each: Vec<Hook>,
    tests: Vec<(String, Body)>,
    children: Vec<Suite>,
}

/// A test flattened together with every hook that applies to it.
struct Planned {
    path: String,
    before: Vec<Hook>,
    after: Vec<Hook>,
    body: Body,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            before_each: Vec::new(),
            after_each: Vec::new(),
            tests: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn describe(&mut self, name: impl Into<String>, build: impl FnOnce(&mut Suite)) {
        let mut child = Suite::new(name);
        build(&mut child);
        self.children.push(child);
    }

    pub fn before_each(&mut self, hook: impl Fn() + 'static) {
        self.before_each.push(Rc::new(hook));
    }

    pub fn after_each(&mut self, hook: impl Fn() + 'static) {
        self.after_each.push(Rc::new(hook));
    }

    pub fn it(&mut self, name: impl Into<String>, body: impl Fn() + 'static) {
        let wrapped: Body = Rc::new(move || {
            body();
            futures::future::ready(()).boxed_local()
        });
        self.tests.push((name.into(), wrapped));
    }

    pub fn it_async<F, Fut>(&mut self, name: impl Into<String>, body: F)
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let wrapped: Body = Rc::new(move || body().boxed_local());
        self.tests.push((name.into(), wrapped));
    }

    /// Runs every test in declaration order and returns their full paths.
    /// A failing test panics, which fails the enclosing `#[test]`.
    pub async fn run(&self) -> Vec<String> {
        let mut plan = Vec::new();
        self.plan(&[], &[], "", &mut plan);

        let mut ran = Vec::with_capacity(plan.len());
        for test in plan {
            for hook in &test.before {
                hook();
            }
            (test.body)().await;
            for hook in &test.after {
                hook();
            }
            ran.push(test.path);
        }
        ran
    }

    /// Synchronous variant for suites whose tests never await a timer.
    pub fn run_blocking(&self) -> Vec<String> {
        futures::executor::block_on(self.run())
    }

    fn plan(&self, before: &[Hook], after: &[Hook], prefix: &str, out: &mut Vec<Planned>) {
        let path = if prefix.is_empty() {
            self.name.clone()
        } else {
            format!("{prefix} > {}", self.name)
        };

        let before: Vec<Hook> = before
            .iter()
            .chain(self.before_each.iter())
            .cloned()
            .collect();
        let after: Vec<Hook> = self
            .after_each
            .iter()
            .rev()
            .chain(after.iter())
            .cloned()
            .collect();

        for (name, body) in &self.tests {
            out.push(Planned {
                path: format!("{path} > {name}"),
                before: before.clone(),
                after: after.clone(),
                body: Rc::clone(body),
            });
        }
        for child in &self.children {
            child.plan(&before, &after, &path, out);
        }
    }
}
