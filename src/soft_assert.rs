use std::fmt;

/// Collects failed checks without stopping at the first one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SoftAssertions {
    checks: usize,
    failures: Vec<String>,
}

impl SoftAssertions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a check; `message` is only built when the check fails.
    pub fn check<F>(&mut self, condition: bool, message: F) -> bool
    where
        F: FnOnce() -> String,
    {
        self.checks += 1;
        if !condition {
            self.failures.push(message());
        }
        condition
    }

    pub fn fail<T: Into<String>>(&mut self, message: T) {
        self.checks += 1;
        self.failures.push(message.into());
    }

    pub fn checks(&self) -> usize {
        self.checks
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn assert_all(self) -> Result<(), SoftAssertionError> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(SoftAssertionError {
                checks: self.checks,
                failures: self.failures,
            })
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoftAssertionError {
    pub checks: usize,
    pub failures: Vec<String>,
}

impl fmt::Display for SoftAssertionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} soft assertions failed",
            self.failures.len(),
            self.checks
        )?;
        for (idx, failure) in self.failures.iter().enumerate() {
            write!(f, "\n-- failure {} --\n{failure}", idx + 1)?;
        }
        Ok(())
    }
}

impl std::error::Error for SoftAssertionError {}
