use chrono::NaiveDate;

// -----------------------------------------------------------------------------
// DateProvider
// -----------------------------------------------------------------------------
/// Source of "today".
///
/// Grids and detectors never read the clock themselves.
/// Callers pass a provider so that the current date can be fixed in tests
/// or overridden from the command line.
pub trait DateProvider {
    fn today(&self) -> NaiveDate;
}

impl<P: DateProvider + ?Sized> DateProvider for &P {
    #[inline]
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

impl<P: DateProvider + ?Sized> DateProvider for Box<P> {
    #[inline]
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

// -----------------------------------------------------------------------------
// SystemDateProvider
// -----------------------------------------------------------------------------
/// Today's date of the local clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SystemDateProvider;

impl DateProvider for SystemDateProvider {
    #[inline]
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

// -----------------------------------------------------------------------------
// FixedDateProvider
// -----------------------------------------------------------------------------
/// Always answers the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedDateProvider(pub NaiveDate);

impl DateProvider for FixedDateProvider {
    #[inline]
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for FixedDateProvider {
    #[inline]
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}
