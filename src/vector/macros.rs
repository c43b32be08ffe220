/// Create a [`Vector`](crate::Vector) containing the arguments.
///
/// The forms mirror the standard `vec!` macro, and each may be prefixed with
/// `in <allocator>;` to build the vector in a specific allocator:
///
/// ```
/// # #[cfg(feature = "alloc")] {
/// use vector_alloc::{vector, Global, Vector};
///
/// let v = vector![1, 2, 3];
/// assert_eq!(v, [1, 2, 3]);
///
/// let filled = vector![2019; 3];
/// assert_eq!(filled, [2019, 2019, 2019]);
///
/// let empty: Vector<u8> = vector![in Global];
/// assert!(empty.is_empty());
/// # }
/// ```
#[macro_export]
macro_rules! vector {
    (in $alloc:expr $(;)?) => (
        $crate::Vector::new_in($alloc)
    );
    (in $alloc:expr; $elem:expr; $n:expr) => (
        $crate::Vector::from_elem_in($n, $elem, $alloc)
    );
    (in $alloc:expr; $($x:expr),+ $(,)?) => (
        $crate::Vector::from_array_in([$($x),+], $alloc)
    );
    () => (
        <$crate::Vector<_>>::new()
    );
    ($elem:expr; $n:expr) => (
        <$crate::Vector<_>>::from_elem($n, $elem)
    );
    ($($x:expr),+ $(,)?) => (
        <$crate::Vector<_>>::from_array([$($x),+])
    );
}
