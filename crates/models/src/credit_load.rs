use crate::status::EnrollmentStatus;

/// One enrolled course as seen by the credit aggregator.
///
/// `credits` is `None` when the section or course behind the registration
/// could not be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditLine<Id> {
    pub enrolled_course: Id,
    pub status: EnrollmentStatus,
    pub credits: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CreditLoadError<Id> {
    /// The registration's section or course no longer exists
    #[error("enrolled course {0} does not resolve to a course")]
    Unresolved(Id),
    /// A course carries a negative credit value
    #[error("enrolled course {0} has negative credits ({1})")]
    NegativeCredits(Id, i32),
    #[error("credit total overflowed")]
    Overflow,
}

/// Sums the credit load of a term.
///
/// Every line must resolve, including the ones that do not count toward the
/// load: a single dangling registration aborts the whole computation rather
/// than producing an under-counted total.
pub fn total_credits<Id: Clone>(lines: &[CreditLine<Id>]) -> Result<i32, CreditLoadError<Id>> {
    let mut total: i32 = 0;

    for line in lines {
        let credits = line
            .credits
            .ok_or_else(|| CreditLoadError::Unresolved(line.enrolled_course.clone()))?;

        if credits < 0 {
            return Err(CreditLoadError::NegativeCredits(
                line.enrolled_course.clone(),
                credits,
            ));
        }

        if line.status.counts_toward_load() {
            total = total.checked_add(credits).ok_or(CreditLoadError::Overflow)?;
        }
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &'static str, status: EnrollmentStatus, credits: Option<i32>) -> CreditLine<&'static str> {
        CreditLine {
            enrolled_course: id,
            status,
            credits,
        }
    }

    #[test]
    fn test_excludes_dropped_courses() {
        let lines = [
            line("MATH101", EnrollmentStatus::Enrolled, Some(3)),
            line("ENG101", EnrollmentStatus::Completed, Some(4)),
            line("HIST101", EnrollmentStatus::Dropped, Some(3)),
        ];

        assert_eq!(total_credits(&lines), Ok(7));
    }

    #[test]
    fn test_excludes_withdrawn_courses() {
        let lines = [
            line("CS101", EnrollmentStatus::Withdrawn, Some(3)),
            line("PE1", EnrollmentStatus::Enrolled, Some(0)),
        ];

        assert_eq!(total_credits(&lines), Ok(0));
    }

    #[test]
    fn test_empty_term_has_no_load() {
        assert_eq!(total_credits::<&str>(&[]), Ok(0));
    }

    #[test]
    fn test_unresolved_line_aborts() {
        let lines = [
            line("MATH101", EnrollmentStatus::Enrolled, Some(3)),
            line("GHOST", EnrollmentStatus::Dropped, None),
        ];

        assert_eq!(
            total_credits(&lines),
            Err(CreditLoadError::Unresolved("GHOST"))
        );
    }

    #[test]
    fn test_negative_credits_abort() {
        let lines = [line("BAD", EnrollmentStatus::Enrolled, Some(-2))];

        assert_eq!(
            total_credits(&lines),
            Err(CreditLoadError::NegativeCredits("BAD", -2))
        );
    }

    #[test]
    fn test_error_messages_name_the_registration() {
        assert_eq!(
            CreditLoadError::Unresolved("REG-7").to_string(),
            "enrolled course REG-7 does not resolve to a course"
        );
        assert_eq!(
            CreditLoadError::NegativeCredits("REG-8", -1).to_string(),
            "enrolled course REG-8 has negative credits (-1)"
        );
    }
}
