/// Cleanup callback registered at list construction.
///
/// When a list is cleared or dropped, each element still in the list is
/// passed to the disposer exactly once. A list built without a disposer
/// simply drops its remaining elements. Values taken out of a list by a
/// remove operation are returned to the caller and never disposed.
pub type Disposer<T> = Box<dyn FnMut(T)>;
