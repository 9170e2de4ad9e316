/// Bind/resize/unbind lifecycle for the animated backdrop.
pub mod backdrop;
