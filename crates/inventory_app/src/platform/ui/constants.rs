pub const TITLE: &str = "Inventaire";
pub const PROMPT: &str = "> ";
pub const LOADING_LABEL: &str = "Chargement…";
pub const ALL_PRODUCTS_LABEL: &str = "Tous les produits";

pub const HELP_TEXT: &str = "\
Commandes :
  search <texte>        rechercher par nom (vide = tout afficher)
  refresh               recharger la vue courante
  add <qte> <nom…>      ajouter un produit (catégorie du formulaire)
  nom <texte>           remplir le nom du formulaire
  qte <n>               remplir la quantité du formulaire
  cat <id> | cat -      choisir la catégorie du formulaire
  add                   envoyer le formulaire
  delta <id> <±n>       ajuster le stock d'un produit
  delete <id>           supprimer un produit (avec confirmation)
  ok                    fermer l'alerte
  help                  afficher cette aide
  quit                  quitter";
