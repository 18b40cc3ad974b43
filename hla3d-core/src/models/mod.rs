pub mod allele;

// re-export for cleaner imports
pub use self::allele::{
    AlleleParts, HlaClass, PolymorphicChain, get_class, get_hla_class, get_hla_locus,
    get_hla_polychain, parse_allele,
};
