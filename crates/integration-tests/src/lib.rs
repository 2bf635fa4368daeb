//! End-to-end router tests live under `tests/`; this library target is
//! intentionally empty.
