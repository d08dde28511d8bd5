use bitflags::bitflags;

bitflags! {
    /// Qualifiers of a native method declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MethodQualifiers: u8 {
        const CONST = 1 << 0;
        const STATIC = 1 << 1;
        const VIRTUAL = 1 << 2;
        const NOEXCEPT = 1 << 3;
    }
}

bitflags! {
    /// Facts about a native class that drive its classification.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClassTraits: u8 {
        /// Copy and move are trivial (memcpy-safe).
        const TRIVIALLY_COPYABLE = 1 << 0;
        /// Has virtual functions.
        const POLYMORPHIC = 1 << 1;
        /// Destructor does work.
        const NON_TRIVIAL_DESTRUCTOR = 1 << 2;
        /// Forward-declared; no members are known.
        const DECLARED_ONLY = 1 << 3;
    }
}

impl ClassTraits {
    /// Traits of a plain-old-data struct.
    pub const fn plain_data() -> Self {
        ClassTraits::TRIVIALLY_COPYABLE
    }

    /// Whether the class may be copied across the boundary by value.
    pub fn is_flat_candidate(self) -> bool {
        self.contains(ClassTraits::TRIVIALLY_COPYABLE)
            && !self.intersects(
                ClassTraits::POLYMORPHIC | ClassTraits::NON_TRIVIAL_DESTRUCTOR | ClassTraits::DECLARED_ONLY,
            )
    }
}
