//! Polarity switch for the input and carrier stages.

/// Which half of a signal passes through the diode nonlinearity.
///
/// | Mode | Behaviour |
/// |------|-----------|
/// | `Negative` | Only the negative half survives, shaped by the diode |
/// | `Bipolar` | Signal passes linearly, no diode |
/// | `Positive` | Only the positive half survives, shaped by the diode |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// Keep the negative half-wave.
    Negative,
    /// Pass the whole signal unshaped.
    #[default]
    Bipolar,
    /// Keep the positive half-wave.
    Positive,
}

impl Polarity {
    /// Switch labels, indexed by parameter value.
    pub const LABELS: &'static [&'static str] = &["Negative", "Bipolar", "Positive"];

    /// Decodes a continuous switch value: `< 0.5` negative, `> 1.5` positive,
    /// anything else (including NaN) bipolar.
    ///
    /// ```rust
    /// use diodering_modules::Polarity;
    ///
    /// assert_eq!(Polarity::from_param(0.0), Polarity::Negative);
    /// assert_eq!(Polarity::from_param(0.5), Polarity::Bipolar);
    /// assert_eq!(Polarity::from_param(1.51), Polarity::Positive);
    /// ```
    #[inline]
    pub fn from_param(value: f32) -> Self {
        if value < 0.5 {
            Polarity::Negative
        } else if value > 1.5 {
            Polarity::Positive
        } else {
            Polarity::Bipolar
        }
    }

    /// Switch position as a parameter value (0, 1 or 2).
    #[inline]
    pub const fn as_param(self) -> f32 {
        match self {
            Polarity::Negative => 0.0,
            Polarity::Bipolar => 1.0,
            Polarity::Positive => 2.0,
        }
    }

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            Polarity::Negative => "Negative",
            Polarity::Bipolar => "Bipolar",
            Polarity::Positive => "Positive",
        }
    }
}
