use crate::{Error, LinkPrediction, LinkPredictor, Result};
use std::sync::Mutex;

/// An inference backend that needs exclusive access for every call (e.g. a
/// runtime session whose `run` takes `&mut self`).
pub trait SerialPredictor: Send {
    fn predict_head(&mut self, relation: &str, tail: &str) -> Result<Vec<LinkPrediction>>;
}

/// Makes a [`SerialPredictor`] shareable: each scoring call runs inside a
/// single mutex-guarded section. Concurrent requests queue on the lock.
pub struct Exclusive<P> {
    inner: Mutex<P>,
}

impl<P: SerialPredictor> Exclusive<P> {
    pub fn new(predictor: P) -> Self {
        Self {
            inner: Mutex::new(predictor),
        }
    }

    pub fn into_inner(self) -> Result<P> {
        self.inner.into_inner().map_err(|_| Error::Poisoned)
    }
}

impl<P: SerialPredictor> LinkPredictor for Exclusive<P> {
    fn predict_head(&self, relation: &str, tail: &str) -> Result<Vec<LinkPrediction>> {
        let mut inner = self.inner.lock().map_err(|_| Error::Poisoned)?;
        inner.predict_head(relation, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    /// Counts calls through `&mut self`, which is only sound under the lock.
    struct Counting {
        calls: usize,
    }

    impl SerialPredictor for Counting {
        fn predict_head(&mut self, relation: &str, tail: &str) -> Result<Vec<LinkPrediction>> {
            self.calls += 1;
            Ok(vec![LinkPrediction::new(
                format!("{relation}:{tail}"),
                self.calls as f32,
            )])
        }
    }

    #[test]
    fn test_exclusive_serialises_calls() {
        let shared = Arc::new(Exclusive::new(Counting { calls: 0 }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let p = Arc::clone(&shared);
                thread::spawn(move || {
                    for _ in 0..25 {
                        p.predict_head("r", "t").unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let inner = Arc::try_unwrap(shared).ok().unwrap().into_inner().unwrap();
        assert_eq!(inner.calls, 200);
    }

    #[test]
    fn test_exclusive_forwards_results() {
        let p = Exclusive::new(Counting { calls: 0 });
        let preds = p.predict_head("isForMealType", "meal_type_dessert").unwrap();
        assert_eq!(preds[0].entity, "isForMealType:meal_type_dessert");
    }
}
