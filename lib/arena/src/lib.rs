//! Arena
//!
//! An arena ties a family of allocations to one common lifetime.
//! Everything allocated on the arena lives as long as the arena does,
//! which lets tree nodes reference each other freely.

mod typed;

pub use typed::TypedArena;

/// Defines an `Arena` type holding a [`TypedArena`] for each of the
/// given `name : type` entries, plus `alloc`/`alloc_iter` entry points
/// dispatched through an `ArenaAllocable` trait.
#[macro_export]
macro_rules! define_arenas {
    ( $([visibility = $vis:vis])? $(
            $name:ident : $ty:ty
    ),* $(,)?) => {

        $($vis)? struct Arena<'ctx> {
            $( $name: $crate::TypedArena<'ctx, $ty>, )*
        }

        impl<'ctx> Arena<'ctx> {
            $($vis)? fn new() -> Self {
                Self {
                    $( $name: $crate::TypedArena::default(), )*
                }
            }

            $($vis)? fn alloc<T>(&self, val: T) -> &'ctx mut T
            where
                T: ArenaAllocable<'ctx>
            {
                val.alloc_into(self)
            }

            $($vis)? fn alloc_iter<T, I>(&self, it: I) -> &'ctx mut [T]
            where
                T: ArenaAllocable<'ctx>,
                I: IntoIterator<Item = T>,
            {
                T::alloc_iter(it, self)
            }
        }

        $($vis)? trait ArenaAllocable<'ctx>: Sized {
            #[allow(clippy::mut_from_ref)]
            fn alloc_into(self, arena: &Arena<'ctx>) -> &'ctx mut Self;

            #[allow(clippy::mut_from_ref)]
            fn alloc_iter<I>(it: I, arena: &Arena<'ctx>) -> &'ctx mut [Self]
            where
                I: IntoIterator<Item = Self>;
        }

        $(
            impl<'ctx> ArenaAllocable<'ctx> for $ty {
                fn alloc_into(self, arena: &Arena<'ctx>) -> &'ctx mut Self {
                    arena . $name .alloc(self)
                }

                fn alloc_iter<I>(it: I, arena: &Arena<'ctx>) -> &'ctx mut [Self]
                where
                    I: IntoIterator<Item = Self>,
                {
                    arena . $name .alloc_iter(it)
                }
            }
        )*
    };
}

#[cfg(test)]
mod test;
