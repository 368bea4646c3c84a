use purevirt_core::class::Members;

/// Names of every resolved routine still marked pure virtual, sorted.
pub fn list_pure_virtual_methods<T: Members + ?Sized>(target: &T) -> Vec<String> {
    target
        .routines()
        .into_iter()
        .filter(|(_, method)| method.is_pure_virtual())
        .map(|(name, _)| name)
        .collect()
}

/// True if any resolved routine is still pure virtual.
pub fn is_pure_virtual_type<T: Members + ?Sized>(target: &T) -> bool {
    target
        .routines()
        .values()
        .any(|method| method.is_pure_virtual())
}
