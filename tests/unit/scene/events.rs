//! Tests for the observer list behind grid change notifications

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use tilegrid::scene::events::ChangeNotifier;

    // Tests every observer runs once per notify
    #[test]
    fn test_notify_reaches_all_observers() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = ChangeNotifier::new();

        for name in ["ui", "autosave"] {
            let log = Rc::clone(&log);
            notifier.subscribe(move || log.borrow_mut().push(name));
        }
        notifier.notify();

        let mut seen = log.borrow().clone();
        seen.sort_unstable();
        assert_eq!(seen, vec!["autosave", "ui"]);
    }

    // Tests unsubscribing removes only the matching observer
    // Verified by clearing all observers on unsubscribe
    #[test]
    fn test_unsubscribe_removes_one() {
        let calls = Rc::new(RefCell::new(0));
        let mut notifier = ChangeNotifier::new();

        let first = {
            let calls = Rc::clone(&calls);
            notifier.subscribe(move || *calls.borrow_mut() += 1)
        };
        let second = {
            let calls = Rc::clone(&calls);
            notifier.subscribe(move || *calls.borrow_mut() += 10)
        };
        assert_ne!(first, second);

        assert!(notifier.unsubscribe(first));
        assert!(!notifier.unsubscribe(first));
        notifier.notify();

        assert_eq!(*calls.borrow(), 10);
        assert_eq!(notifier.len(), 1);
    }

    #[test]
    fn test_empty_notifier() {
        let mut notifier = ChangeNotifier::default();
        notifier.notify();

        assert!(notifier.is_empty());
        assert!(format!("{notifier:?}").contains("observers: 0"));
    }
}
