macro_rules! from_val_to_enum {
    ($ob:ident $to:ident $($t:ty)*) => ($(
        impl From<$t> for $ob {
            fn from(value: $t) -> Self {
                Self::$to(value)
            }
        }
    )*)
}

macro_rules! from_val_to_enum_into {
    ($ob:ident $to:ident $($t:ty)*) => ($(
        impl From<$t> for $ob {
            fn from(value: $t) -> Self {
                Self::$to(value.into())
            }
        }
    )*)
}

macro_rules! from_vec_to_list {
    ($ob:ident $to:ident $($t:ty)*) => ($(
        impl From<Vec<$t>> for $ob {
            fn from(value: Vec<$t>) -> Self {
                Self::$to(value.into_iter().map(Into::into).collect())
            }
        }
    )*)
}
