macro_rules! impl_deref_mut {
	// for structs wrapping a byte array
	($($struct_name:ident {$field:ident, $type:ty}),+ $(,)?) => {
		$(
			impl std::ops::Deref for $struct_name {
				type Target = $type;
				fn deref(&self) -> &Self::Target {
					&self.$field
				}
			}

			impl std::ops::DerefMut for $struct_name {
				fn deref_mut(&mut self) -> &mut Self::Target {
			        &mut self.$field
			    }
			}
		)+
	};
}

pub(crate) use impl_deref_mut;
