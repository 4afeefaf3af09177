//! Future combinator macros.
//!
//! [`join!`](crate::join) drives several futures concurrently and yields
//! all their outputs; [`select!`](crate::select) races futures and runs the
//! handler of whichever finishes first. Both poll their futures within the
//! current task; nothing is spawned.

/// Awaits several futures concurrently, yielding a tuple of their outputs.
///
/// All futures are polled within the current task; the macro completes once
/// every future has. Supports up to four futures.
///
/// # Examples
///
/// ```rust,ignore
/// let (a, b) = join!(async { 1 }, async { 2 });
/// assert_eq!(a + b, 3);
/// ```
#[macro_export]
macro_rules! join {
    ($f1:expr $(,)?) => {{ $f1.await }};

    ($f1:expr, $f2:expr $(,)?) => {{
        use ::std::future::Future as _;
        use ::std::task::Poll;

        let mut f1 = (::std::boxed::Box::pin($f1), ::core::option::Option::None, false);
        let mut f2 = (::std::boxed::Box::pin($f2), ::core::option::Option::None, false);

        ::std::future::poll_fn(move |cx| {
            if !f1.2 {
                if let Poll::Ready(val) = f1.0.as_mut().poll(cx) {
                    f1.1 = ::core::option::Option::Some(val);
                    f1.2 = true;
                }
            }
            if !f2.2 {
                if let Poll::Ready(val) = f2.0.as_mut().poll(cx) {
                    f2.1 = ::core::option::Option::Some(val);
                    f2.2 = true;
                }
            }

            if f1.2 && f2.2 {
                Poll::Ready((f1.1.take().unwrap(), f2.1.take().unwrap()))
            } else {
                Poll::Pending
            }
        })
        .await
    }};

    ($f1:expr, $f2:expr, $f3:expr $(,)?) => {{
        use ::std::future::Future as _;
        use ::std::task::Poll;

        let mut f1 = (::std::boxed::Box::pin($f1), ::core::option::Option::None, false);
        let mut f2 = (::std::boxed::Box::pin($f2), ::core::option::Option::None, false);
        let mut f3 = (::std::boxed::Box::pin($f3), ::core::option::Option::None, false);

        ::std::future::poll_fn(move |cx| {
            if !f1.2 {
                if let Poll::Ready(val) = f1.0.as_mut().poll(cx) {
                    f1.1 = ::core::option::Option::Some(val);
                    f1.2 = true;
                }
            }
            if !f2.2 {
                if let Poll::Ready(val) = f2.0.as_mut().poll(cx) {
                    f2.1 = ::core::option::Option::Some(val);
                    f2.2 = true;
                }
            }
            if !f3.2 {
                if let Poll::Ready(val) = f3.0.as_mut().poll(cx) {
                    f3.1 = ::core::option::Option::Some(val);
                    f3.2 = true;
                }
            }

            if f1.2 && f2.2 && f3.2 {
                Poll::Ready((
                    f1.1.take().unwrap(),
                    f2.1.take().unwrap(),
                    f3.1.take().unwrap(),
                ))
            } else {
                Poll::Pending
            }
        })
        .await
    }};

    ($f1:expr, $f2:expr, $f3:expr, $f4:expr $(,)?) => {{
        use ::std::future::Future as _;
        use ::std::task::Poll;

        let mut f1 = (::std::boxed::Box::pin($f1), ::core::option::Option::None, false);
        let mut f2 = (::std::boxed::Box::pin($f2), ::core::option::Option::None, false);
        let mut f3 = (::std::boxed::Box::pin($f3), ::core::option::Option::None, false);
        let mut f4 = (::std::boxed::Box::pin($f4), ::core::option::Option::None, false);

        ::std::future::poll_fn(move |cx| {
            if !f1.2 {
                if let Poll::Ready(val) = f1.0.as_mut().poll(cx) {
                    f1.1 = ::core::option::Option::Some(val);
                    f1.2 = true;
                }
            }
            if !f2.2 {
                if let Poll::Ready(val) = f2.0.as_mut().poll(cx) {
                    f2.1 = ::core::option::Option::Some(val);
                    f2.2 = true;
                }
            }
            if !f3.2 {
                if let Poll::Ready(val) = f3.0.as_mut().poll(cx) {
                    f3.1 = ::core::option::Option::Some(val);
                    f3.2 = true;
                }
            }
            if !f4.2 {
                if let Poll::Ready(val) = f4.0.as_mut().poll(cx) {
                    f4.1 = ::core::option::Option::Some(val);
                    f4.2 = true;
                }
            }

            if f1.2 && f2.2 && f3.2 && f4.2 {
                Poll::Ready((
                    f1.1.take().unwrap(),
                    f2.1.take().unwrap(),
                    f3.1.take().unwrap(),
                    f4.1.take().unwrap(),
                ))
            } else {
                Poll::Pending
            }
        })
        .await
    }};
}

/// Races futures, running the handler of whichever completes first.
///
/// Each branch is `future => |binding| handler`. Branches are polled in the
/// order written, so completion ties resolve toward earlier branches.
/// Supports up to four branches.
///
/// # Examples
///
/// ```rust,ignore
/// let out = select!(
///     ready => |value| value,
///     sleep(limit) => |_| fallback,
/// );
/// ```
#[macro_export]
macro_rules! select {
    (
        $f1:expr => |$v1:pat_param| $r1:expr $(,)?
    ) => {{
        let $v1 = $f1.await;
        $r1
    }};

    (
        $f1:expr => |$v1:pat_param| $r1:expr,
        $f2:expr => |$v2:pat_param| $r2:expr $(,)?
    ) => {{
        use ::std::future::Future as _;
        use ::std::task::Poll;

        enum Winner<A, B> {
            F1(A),
            F2(B),
        }

        let mut f1 = ::std::boxed::Box::pin($f1);
        let mut f2 = ::std::boxed::Box::pin($f2);

        let winner = ::std::future::poll_fn(move |cx| {
            if let Poll::Ready(val) = f1.as_mut().poll(cx) {
                return Poll::Ready(Winner::F1(val));
            }
            if let Poll::Ready(val) = f2.as_mut().poll(cx) {
                return Poll::Ready(Winner::F2(val));
            }
            Poll::Pending
        })
        .await;

        match winner {
            Winner::F1($v1) => $r1,
            Winner::F2($v2) => $r2,
        }
    }};

    (
        $f1:expr => |$v1:pat_param| $r1:expr,
        $f2:expr => |$v2:pat_param| $r2:expr,
        $f3:expr => |$v3:pat_param| $r3:expr $(,)?
    ) => {{
        use ::std::future::Future as _;
        use ::std::task::Poll;

        enum Winner<A, B, C> {
            F1(A),
            F2(B),
            F3(C),
        }

        let mut f1 = ::std::boxed::Box::pin($f1);
        let mut f2 = ::std::boxed::Box::pin($f2);
        let mut f3 = ::std::boxed::Box::pin($f3);

        let winner = ::std::future::poll_fn(move |cx| {
            if let Poll::Ready(val) = f1.as_mut().poll(cx) {
                return Poll::Ready(Winner::F1(val));
            }
            if let Poll::Ready(val) = f2.as_mut().poll(cx) {
                return Poll::Ready(Winner::F2(val));
            }
            if let Poll::Ready(val) = f3.as_mut().poll(cx) {
                return Poll::Ready(Winner::F3(val));
            }
            Poll::Pending
        })
        .await;

        match winner {
            Winner::F1($v1) => $r1,
            Winner::F2($v2) => $r2,
            Winner::F3($v3) => $r3,
        }
    }};

    (
        $f1:expr => |$v1:pat_param| $r1:expr,
        $f2:expr => |$v2:pat_param| $r2:expr,
        $f3:expr => |$v3:pat_param| $r3:expr,
        $f4:expr => |$v4:pat_param| $r4:expr $(,)?
    ) => {{
        use ::std::future::Future as _;
        use ::std::task::Poll;

        enum Winner<A, B, C, D> {
            F1(A),
            F2(B),
            F3(C),
            F4(D),
        }

        let mut f1 = ::std::boxed::Box::pin($f1);
        let mut f2 = ::std::boxed::Box::pin($f2);
        let mut f3 = ::std::boxed::Box::pin($f3);
        let mut f4 = ::std::boxed::Box::pin($f4);

        let winner = ::std::future::poll_fn(move |cx| {
            if let Poll::Ready(val) = f1.as_mut().poll(cx) {
                return Poll::Ready(Winner::F1(val));
            }
            if let Poll::Ready(val) = f2.as_mut().poll(cx) {
                return Poll::Ready(Winner::F2(val));
            }
            if let Poll::Ready(val) = f3.as_mut().poll(cx) {
                return Poll::Ready(Winner::F3(val));
            }
            if let Poll::Ready(val) = f4.as_mut().poll(cx) {
                return Poll::Ready(Winner::F4(val));
            }
            Poll::Pending
        })
        .await;

        match winner {
            Winner::F1($v1) => $r1,
            Winner::F2($v2) => $r2,
            Winner::F3($v3) => $r3,
            Winner::F4($v4) => $r4,
        }
    }};
}
