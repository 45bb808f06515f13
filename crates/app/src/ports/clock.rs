//! Clock port — where "now" comes from.

use lamplighter_domain::time::Timestamp;

/// Supplies the current local time in the controller's timezone.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

impl<T: Clock + ?Sized> Clock for std::rc::Rc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
